use crate::types::{PageDensity, PageId, PageRect, PageSide, PageStyle, PageTransform};

use super::{side_position, spine_origin, Draw};

/// A page sitting in the spread with no animation of its own. It still
/// carries a hard angle: during a hard turn the engine drives the
/// neighboring static page as the rigid page's back face.
#[derive(Debug, Clone)]
pub struct StaticPage {
    pub(crate) id: PageId,
    pub(crate) side: Option<PageSide>,
    pub(crate) density: PageDensity,
    pub(crate) hard_angle: f64,
}

impl StaticPage {
    pub fn new(id: PageId, density: PageDensity) -> Self {
        StaticPage {
            id,
            side: None,
            density,
            hard_angle: 0.0,
        }
    }
}

impl Draw for StaticPage {
    fn draw(&self, density: Option<PageDensity>, rect: &PageRect) -> PageStyle {
        let density = density.unwrap_or(self.density);
        let transform = match density {
            PageDensity::Hard => PageTransform::Hard {
                origin: spine_origin(self.side, rect),
                angle_deg: self.hard_angle,
            },
            PageDensity::Soft => PageTransform::Identity,
        };
        PageStyle {
            page: self.id,
            visible: true,
            z_order: 0,
            position: side_position(self.side, rect),
            width: rect.page_width,
            height: rect.height,
            transform,
        }
    }

    fn simple_draw(&self, side: PageSide, rect: &PageRect) -> PageStyle {
        PageStyle {
            page: self.id,
            visible: true,
            z_order: 0,
            position: side_position(Some(side), rect),
            width: rect.page_width,
            height: rect.height,
            transform: PageTransform::Identity,
        }
    }
}
