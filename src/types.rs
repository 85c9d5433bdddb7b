//! Shared boundary types for the page-flip engine.
//!
//! This module defines the two key data contracts:
//! - Driver → Engine: `Shadow` descriptors, `PageRect` layout, pose state
//! - Engine → Backend: `Frame` containing `PageStyle`s and `ShadowStyle`s
//!
//! The engine recomputes a whole `Frame` per animation tick; a backend
//! turns these descriptors into visible output. Nothing here knows about
//! any particular rendering technology.

use serde::{Deserialize, Serialize};

use crate::geometry::rect_points;

// ---------------------------------------------------------------------------
// Core enums
// ---------------------------------------------------------------------------

/// Viewport orientation. Landscape shows two page slots side by side;
/// portrait collapses to one visible slot plus a hidden counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Landscape,
    Portrait,
}

/// Which way the page is turning: right-to-left (`Forward`) or
/// left-to-right (`Back`). Flips the sign/mirroring of all shadow and
/// rotation math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipDirection {
    Forward,
    Back,
}

/// Whether a page bends continuously (`Soft`) or rotates rigidly about the
/// spine like a cover (`Hard`). The two densities use different transform
/// and shadow models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageDensity {
    Soft,
    Hard,
}

/// A page's own side within the spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSide {
    Left,
    Right,
}

/// Stable page identity. Slot aliasing checks ("is the left page the same
/// page as the bottom page?") are id equality, never object comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PageId(pub usize);

// ---------------------------------------------------------------------------
// Driver → Engine boundary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// The viewport-relative page rectangle, recomputed by the layout
/// collaborator whenever viewport size or orientation changes. Read-only
/// input to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRect {
    pub left: f64,
    pub top: f64,
    /// Full spread width (both slots in landscape).
    pub width: f64,
    pub height: f64,
    /// Width of a single page slot.
    pub page_width: f64,
    /// Page-local corner points (top-left, top-right, bottom-right,
    /// bottom-left).
    pub corners: [Point; 4],
}

impl PageRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64, orientation: Orientation) -> Self {
        let page_width = match orientation {
            Orientation::Landscape => width / 2.0,
            Orientation::Portrait => width,
        };
        PageRect {
            left,
            top,
            width,
            height,
            page_width,
            corners: rect_points(width, height),
        }
    }

    /// The single page-local → viewport-global conversion boundary. All
    /// rotation math stays page-local; positions cross over here.
    pub fn to_global(&self, pos: Point) -> Point {
        Point::new(pos.x + self.left, pos.y + self.top)
    }
}

/// Shadow descriptor, replaced wholesale by the animation driver each time
/// progress changes and consumed read-only once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    /// Anchor point in page-local coordinates.
    pub pos: Point,
    /// Angle of the fold, radians.
    pub angle: f64,
    /// 0–200 animation parameter; 100 = page perpendicular to the spread.
    pub progress: f64,
    /// 0–1.
    pub opacity: f64,
    /// Shadow band width, px.
    pub width: f64,
}

// ---------------------------------------------------------------------------
// Engine → Backend boundary
// ---------------------------------------------------------------------------

/// Transform applied to a page element. Structured rather than stringly so
/// a backend can render it with whatever technology it has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageTransform {
    /// No animation: the page sits at its `PageStyle` position.
    Identity,
    /// Curling sheet: translate within the page rect, rotate by `rotate`
    /// radians, and mask to the clip polygon (page-local coordinates).
    Soft {
        translate: Point,
        rotate: f64,
        clip: Vec<Point>,
    },
    /// Rigid cover: rotate `angle_deg` degrees about the spine axis
    /// anchored at `origin` (page-local).
    Hard { origin: Point, angle_deg: f64 },
}

/// Everything a backend needs to place one page element for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageStyle {
    pub page: PageId,
    pub visible: bool,
    pub z_order: i32,
    /// Viewport-global top-left of the element.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub transform: PageTransform,
}

impl PageStyle {
    /// The neutral style the clear pass assigns to every managed page that
    /// occupies no slot: hidden, base stacking order, identity transform.
    pub fn hidden(page: PageId, z_order: i32) -> Self {
        PageStyle {
            page,
            visible: false,
            z_order,
            position: Point::default(),
            width: 0.0,
            height: 0.0,
            transform: PageTransform::Identity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientDirection {
    ToLeft,
    ToRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// 0–1 along the gradient axis.
    pub offset: f64,
    /// 0–1 black alpha at this stop.
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub direction: GradientDirection,
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    pub fn new(direction: GradientDirection, stops: &[(f64, f64)]) -> Self {
        Gradient {
            direction,
            stops: stops
                .iter()
                .map(|&(offset, alpha)| GradientStop { offset, alpha })
                .collect(),
        }
    }
}

/// One shadow primitive for one frame. Always emitted whole — a backend
/// never sees a partially updated shadow, which is what prevents visible
/// tearing between position and clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowStyle {
    pub visible: bool,
    pub z_order: i32,
    /// Viewport-global anchor of the shadow element.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Translation applied before `rotate`.
    pub translate: Point,
    /// Rotation in radians about `transform_origin`.
    pub rotate: f64,
    pub transform_origin: Point,
    /// 180° face flip (hard shadows swing past vertical).
    pub mirror: bool,
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
    /// Clip polygon in the shadow's local frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip: Option<Vec<Point>>,
}

impl ShadowStyle {
    pub fn hidden() -> Self {
        ShadowStyle {
            visible: false,
            z_order: 0,
            position: Point::default(),
            width: 0.0,
            height: 0.0,
            translate: Point::default(),
            rotate: 0.0,
            transform_origin: Point::default(),
            mirror: false,
            opacity: 0.0,
            gradient: None,
            clip: None,
        }
    }
}

/// The four shadow primitives. Exactly one pair (soft outer/inner or hard
/// outer/inner) is visible while a page is turning; all four are hidden
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowSet {
    pub outer: ShadowStyle,
    pub inner: ShadowStyle,
    pub hard_outer: ShadowStyle,
    pub hard_inner: ShadowStyle,
}

impl ShadowSet {
    pub fn hidden() -> Self {
        ShadowSet {
            outer: ShadowStyle::hidden(),
            inner: ShadowStyle::hidden(),
            hard_outer: ShadowStyle::hidden(),
            hard_inner: ShadowStyle::hidden(),
        }
    }
}

/// One produced animation frame: a style for every managed page element
/// (hidden ones included) plus the four shadow primitives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub pages: Vec<PageStyle>,
    pub shadows: ShadowSet,
}
