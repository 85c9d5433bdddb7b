//! Page abstraction — the entities the render engine places into slots.
//!
//! A page is either static (sitting in the spread) or flipping (mid-turn,
//! carrying an animated pose). Each variant lives in its own module with
//! its struct and `Draw` implementation side by side.

mod flipping_page;
mod static_page;

pub use flipping_page::{FlipPose, FlippingPage};
pub use static_page::StaticPage;

use crate::types::{PageDensity, PageId, PageRect, PageSide, PageStyle, Point};

/// Render a page into a one-frame style descriptor.
///
/// `draw` is pose-aware: a hard page renders a rigid spine rotation at its
/// current hard angle, a soft flipping page renders its flip pose.
/// `simple_draw` is pure static placement with no animation applied.
pub trait Draw {
    fn draw(&self, density: Option<PageDensity>, rect: &PageRect) -> PageStyle;
    fn simple_draw(&self, side: PageSide, rect: &PageRect) -> PageStyle;
}

/// A managed page. The engine owns these by value in its registry and
/// refers to them by `PageId` from the four slots.
#[derive(Debug, Clone)]
pub enum Page {
    Static(StaticPage),
    Flipping(FlippingPage),
}

impl Page {
    pub fn id(&self) -> PageId {
        match self {
            Page::Static(p) => p.id,
            Page::Flipping(p) => p.id,
        }
    }

    pub fn side(&self) -> Option<PageSide> {
        match self {
            Page::Static(p) => p.side,
            Page::Flipping(p) => p.side,
        }
    }

    /// Assign which side of the spread the page belongs to. Must happen
    /// before the page is drawn in a slot.
    pub fn set_side(&mut self, side: PageSide) {
        match self {
            Page::Static(p) => p.side = Some(side),
            Page::Flipping(p) => p.side = Some(side),
        }
    }

    pub fn drawing_density(&self) -> PageDensity {
        match self {
            Page::Static(p) => p.density,
            Page::Flipping(p) => p.density,
        }
    }

    /// Current rigid-rotation angle, degrees.
    pub fn hard_angle(&self) -> f64 {
        match self {
            Page::Static(p) => p.hard_angle,
            Page::Flipping(p) => p.hard_angle,
        }
    }

    pub fn set_hard_angle(&mut self, degrees: f64) {
        match self {
            Page::Static(p) => p.hard_angle = degrees,
            Page::Flipping(p) => p.hard_angle = degrees,
        }
    }

    /// Update the animated pose. No-op on a static page.
    pub fn set_pose(&mut self, pose: FlipPose) {
        if let Page::Flipping(p) = self {
            p.pose = pose;
        }
    }

    /// Promote to the flipping variant, keeping identity and density.
    pub fn into_flipping(self, pose: FlipPose) -> Page {
        match self {
            Page::Static(p) => Page::Flipping(FlippingPage {
                id: p.id,
                side: p.side,
                density: p.density,
                hard_angle: p.hard_angle,
                pose,
            }),
            Page::Flipping(mut p) => {
                p.pose = pose;
                Page::Flipping(p)
            }
        }
    }

    /// Demote to the static variant once the turn has finished. The hard
    /// angle is reset: a settled page lies flat.
    pub fn settle(self) -> Page {
        match self {
            Page::Flipping(p) => Page::Static(StaticPage {
                id: p.id,
                side: p.side,
                density: p.density,
                hard_angle: 0.0,
            }),
            other => other,
        }
    }
}

impl Draw for Page {
    fn draw(&self, density: Option<PageDensity>, rect: &PageRect) -> PageStyle {
        match self {
            Page::Static(p) => p.draw(density, rect),
            Page::Flipping(p) => p.draw(density, rect),
        }
    }

    fn simple_draw(&self, side: PageSide, rect: &PageRect) -> PageStyle {
        match self {
            Page::Static(p) => p.simple_draw(side, rect),
            Page::Flipping(p) => p.simple_draw(side, rect),
        }
    }
}

/// Viewport-global top-left of a page slot. A missing side falls back to
/// the left slot — drawing with no side set is a driver bug, and a
/// misplaced page beats a panic mid-animation.
pub(crate) fn side_position(side: Option<PageSide>, rect: &PageRect) -> Point {
    match side {
        Some(PageSide::Right) => rect.to_global(Point::new(rect.page_width, 0.0)),
        _ => rect.to_global(Point::new(0.0, 0.0)),
    }
}

/// Page-local anchor of the spine axis a hard page rotates about: the
/// right edge for a left page, the left edge for a right page.
pub(crate) fn spine_origin(side: Option<PageSide>, rect: &PageRect) -> Point {
    match side {
        Some(PageSide::Left) => Point::new(rect.page_width, 0.0),
        _ => Point::new(0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Orientation, PageTransform};

    fn rect() -> PageRect {
        PageRect::new(10.0, 20.0, 800.0, 600.0, Orientation::Landscape)
    }

    #[test]
    fn simple_draw_places_by_slot_side() {
        let page = Page::Static(StaticPage::new(PageId(0), PageDensity::Soft));
        let left = page.simple_draw(PageSide::Left, &rect());
        let right = page.simple_draw(PageSide::Right, &rect());

        assert_eq!(left.position, Point::new(10.0, 20.0));
        assert_eq!(right.position, Point::new(410.0, 20.0));
        assert_eq!(left.width, 400.0);
        assert_eq!(left.height, 600.0);
        assert_eq!(left.transform, PageTransform::Identity);
        assert!(left.visible);
    }

    #[test]
    fn hard_draw_rotates_about_the_spine() {
        let mut page = Page::Static(StaticPage::new(PageId(1), PageDensity::Hard));
        page.set_side(PageSide::Left);
        page.set_hard_angle(-30.0);

        let style = page.draw(None, &rect());
        match style.transform {
            PageTransform::Hard { origin, angle_deg } => {
                assert_eq!(origin, Point::new(400.0, 0.0));
                assert_eq!(angle_deg, -30.0);
            }
            other => panic!("expected hard transform, got {other:?}"),
        }
    }

    #[test]
    fn density_override_switches_the_transform_model() {
        let mut page = Page::Static(StaticPage::new(PageId(2), PageDensity::Soft));
        page.set_side(PageSide::Right);

        let soft = page.draw(None, &rect());
        assert_eq!(soft.transform, PageTransform::Identity);

        let hard = page.draw(Some(PageDensity::Hard), &rect());
        assert!(matches!(hard.transform, PageTransform::Hard { .. }));
    }

    #[test]
    fn flipping_soft_draw_carries_the_pose() {
        let pose = FlipPose {
            position: Point::new(120.0, 35.0),
            angle: 0.7,
            clip: vec![Point::new(0.0, 0.0), Point::new(400.0, 0.0)],
        };
        let page = Page::Static(StaticPage::new(PageId(3), PageDensity::Soft));
        let mut page = page.into_flipping(pose.clone());
        page.set_side(PageSide::Right);

        let style = page.draw(None, &rect());
        match style.transform {
            PageTransform::Soft {
                translate,
                rotate,
                clip,
            } => {
                assert_eq!(translate, pose.position);
                assert_eq!(rotate, 0.7);
                assert_eq!(clip.len(), 2);
            }
            other => panic!("expected soft transform, got {other:?}"),
        }
    }

    #[test]
    fn settle_resets_the_hard_angle() {
        let mut page = Page::Static(StaticPage::new(PageId(4), PageDensity::Hard))
            .into_flipping(FlipPose::default());
        page.set_hard_angle(95.0);
        let settled = page.settle();
        assert_eq!(settled.hard_angle(), 0.0);
        assert!(matches!(settled, Page::Static(_)));
    }
}
