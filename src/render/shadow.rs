//! The four shadow computations.
//!
//! Soft pages get a gradient-filled, rotated, clipped polygon pair
//! (outer/inner); hard pages get a rigid pair anchored at the spine whose
//! face mirrors as the cover swings past vertical. Each function builds
//! one complete `ShadowStyle` — callers assign it wholesale so a backend
//! never observes a half-updated shadow.

use std::f64::consts::PI;

use crate::geometry::{rect_points, rotate_point};
use crate::types::{
    FlipDirection, Gradient, GradientDirection, PageRect, Point, Shadow, ShadowStyle,
};

use super::{Z_HARD_SHADOW, Z_SOFT_SHADOW};

/// Inner shadows run at three quarters of the descriptor width.
const INNER_WIDTH_FACTOR: f64 = 0.75;

/// Fold progress so values above 100 mirror values below it: the shadow
/// grows toward the halfway point (page perpendicular) and shrinks
/// symmetrically past it. Result is always within [0, 100].
pub(crate) fn fold_progress(progress: f64) -> f64 {
    let folded = if progress > 100.0 {
        200.0 - progress
    } else {
        progress
    };
    folded.clamp(0.0, 100.0)
}

/// Whether the hard shadow shows its mirrored face. The tie-break: a
/// forward turn past vertical looks like a back turn before it, and vice
/// versa. Uses the raw (unfolded) progress.
pub(crate) fn hard_mirror(direction: FlipDirection, progress: f64) -> bool {
    (direction == FlipDirection::Forward && progress > 100.0)
        || (direction == FlipDirection::Back && progress <= 100.0)
}

/// Take page-local corners into the shadow's local frame: subtract the
/// shadow anchor, negate x when the turn runs backwards (the anchor flips
/// sides), then rotate about the translated pivot.
fn shadow_clip(
    corners: &[Point],
    anchor: Point,
    direction: FlipDirection,
    shadow_translate: f64,
    angle: f64,
) -> Vec<Point> {
    let pivot = Point::new(shadow_translate, 100.0);
    corners
        .iter()
        .map(|p| {
            let mut local = Point::new(p.x - anchor.x, p.y - anchor.y);
            if direction == FlipDirection::Back {
                local.x = -local.x;
            }
            rotate_point(local, pivot, angle)
        })
        .collect()
}

pub(crate) fn soft_outer(
    shadow: &Shadow,
    rect: &PageRect,
    direction: FlipDirection,
    z_base: i32,
) -> ShadowStyle {
    let width = shadow.width.min(rect.page_width);
    let shadow_translate = match direction {
        FlipDirection::Back => width,
        FlipDirection::Forward => 0.0,
    };
    let angle = shadow.angle + 3.0 * PI / 2.0;
    let gradient_direction = match direction {
        FlipDirection::Forward => GradientDirection::ToRight,
        FlipDirection::Back => GradientDirection::ToLeft,
    };

    ShadowStyle {
        visible: true,
        z_order: z_base + Z_SOFT_SHADOW,
        position: rect.to_global(shadow.pos),
        width,
        height: rect.height * 2.0,
        translate: Point::new(-shadow_translate, -100.0),
        rotate: angle,
        transform_origin: Point::new(shadow_translate, 100.0),
        mirror: false,
        opacity: shadow.opacity,
        gradient: Some(Gradient::new(gradient_direction, &[(0.0, 1.0), (1.0, 0.0)])),
        clip: Some(shadow_clip(
            &rect_points(rect.width, rect.height),
            shadow.pos,
            direction,
            shadow_translate,
            angle,
        )),
    }
}

pub(crate) fn soft_inner(
    shadow: &Shadow,
    rect: &PageRect,
    direction: FlipDirection,
    z_base: i32,
) -> ShadowStyle {
    let width = (shadow.width * INNER_WIDTH_FACTOR).min(rect.page_width);
    let shadow_translate = match direction {
        FlipDirection::Back => width,
        FlipDirection::Forward => 0.0,
    };
    let angle = shadow.angle + 3.0 * PI / 2.0;
    // Opposite gradient to the outer shadow: the band darkens the page
    // surface under the fold rather than the page being revealed.
    let gradient_direction = match direction {
        FlipDirection::Forward => GradientDirection::ToLeft,
        FlipDirection::Back => GradientDirection::ToRight,
    };

    ShadowStyle {
        visible: true,
        z_order: z_base + Z_SOFT_SHADOW,
        position: rect.to_global(shadow.pos),
        width,
        height: rect.height * 2.0,
        translate: Point::new(-shadow_translate, -100.0),
        rotate: angle,
        transform_origin: Point::new(shadow_translate, 100.0),
        mirror: false,
        opacity: shadow.opacity,
        gradient: Some(Gradient::new(
            gradient_direction,
            &[(0.05, 1.0), (0.15, 0.05), (0.35, 1.0), (1.0, 0.0)],
        )),
        clip: Some(shadow_clip(
            &rect.corners,
            shadow.pos,
            direction,
            shadow_translate,
            angle,
        )),
    }
}

pub(crate) fn hard_outer(
    shadow: &Shadow,
    rect: &PageRect,
    direction: FlipDirection,
    z_base: i32,
) -> ShadowStyle {
    let folded = fold_progress(shadow.progress);
    let width = (shadow.width * folded / 100.0).min(rect.page_width);
    let mirror = hard_mirror(direction, shadow.progress);
    let gradient_direction = if mirror {
        GradientDirection::ToRight
    } else {
        GradientDirection::ToLeft
    };

    ShadowStyle {
        visible: true,
        z_order: z_base + Z_HARD_SHADOW,
        // Anchored at the spine.
        position: rect.to_global(Point::new(rect.width / 2.0, 0.0)),
        width,
        height: rect.height,
        translate: Point::default(),
        rotate: 0.0,
        transform_origin: Point::default(),
        mirror,
        opacity: shadow.opacity,
        gradient: Some(Gradient::new(gradient_direction, &[(0.05, 1.0), (1.0, 0.0)])),
        clip: None,
    }
}

pub(crate) fn hard_inner(
    shadow: &Shadow,
    rect: &PageRect,
    direction: FlipDirection,
    z_base: i32,
) -> ShadowStyle {
    let folded = fold_progress(shadow.progress);
    let width = (shadow.width * INNER_WIDTH_FACTOR * folded / 100.0).min(rect.page_width);
    let outer_mirror = hard_mirror(direction, shadow.progress);
    let gradient_direction = if outer_mirror {
        GradientDirection::ToLeft
    } else {
        GradientDirection::ToRight
    };

    ShadowStyle {
        visible: true,
        z_order: z_base + Z_HARD_SHADOW,
        position: rect.to_global(Point::new(rect.width / 2.0, 0.0)),
        width,
        height: rect.height,
        translate: Point::default(),
        rotate: 0.0,
        transform_origin: Point::default(),
        // The inner band sits on the opposite face of the cover.
        mirror: !outer_mirror,
        opacity: shadow.opacity * folded / 100.0,
        gradient: Some(Gradient::new(
            gradient_direction,
            &[(0.05, 1.0), (0.15, 0.05), (0.35, 1.0), (1.0, 0.0)],
        )),
        clip: None,
    }
}
