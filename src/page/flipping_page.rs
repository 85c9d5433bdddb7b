use serde::{Deserialize, Serialize};

use crate::types::{PageDensity, PageId, PageRect, PageSide, PageStyle, PageTransform, Point};

use super::{side_position, spine_origin, Draw};

/// The continuously updated pose of a soft page mid-turn, supplied by the
/// external flip calculator each tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlipPose {
    /// Page-local translation of the curling sheet.
    pub position: Point,
    /// Rotation of the sheet, radians.
    pub angle: f64,
    /// Page-local polygon masking the sheet to its visible silhouette.
    #[serde(default)]
    pub clip: Vec<Point>,
}

/// The page actively mid-turn. Soft pages render their `FlipPose`; hard
/// pages ignore it and render a rigid spine rotation at `hard_angle`.
#[derive(Debug, Clone)]
pub struct FlippingPage {
    pub(crate) id: PageId,
    pub(crate) side: Option<PageSide>,
    pub(crate) density: PageDensity,
    pub(crate) hard_angle: f64,
    pub(crate) pose: FlipPose,
}

impl Draw for FlippingPage {
    fn draw(&self, density: Option<PageDensity>, rect: &PageRect) -> PageStyle {
        let density = density.unwrap_or(self.density);
        let (position, transform) = match density {
            PageDensity::Soft => (
                rect.to_global(Point::default()),
                PageTransform::Soft {
                    translate: self.pose.position,
                    rotate: self.pose.angle,
                    clip: self.pose.clip.clone(),
                },
            ),
            PageDensity::Hard => (
                side_position(self.side, rect),
                PageTransform::Hard {
                    origin: spine_origin(self.side, rect),
                    angle_deg: self.hard_angle,
                },
            ),
        };
        PageStyle {
            page: self.id,
            visible: true,
            z_order: 0,
            position,
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
