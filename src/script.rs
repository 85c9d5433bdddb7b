//! Scripted flip sequences — the human-authored demo format.
//!
//! A `FlipScript` describes *what the driver would do*: a viewport, a page
//! list, and one pose per frame. Running it drives a `FlipRender` through
//! the sequence and collects the produced frames, which is the whole
//! engine exercised end to end without any backend.

use serde::{Deserialize, Serialize};

use crate::page::FlipPose;
use crate::render::FlipRender;
use crate::types::{FlipDirection, Frame, Orientation, PageDensity, PageId, PageRect, PageSide, Shadow};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipScript {
    pub viewport: Viewport,
    pub orientation: Orientation,
    pub pages: Vec<PageSpec>,
    pub frames: Vec<FrameSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSpec {
    pub density: PageDensity,
}

/// One animation tick: slot assignments by page index, plus the turning
/// page's pose and the shadow descriptor for this instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSpec {
    pub direction: FlipDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flipping: Option<FlipSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlipSpec {
    pub page: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<PageSide>,
    #[serde(default)]
    pub pose: FlipPose,
    /// Rigid rotation for hard pages, degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_angle: Option<f64>,
}

impl FlipScript {
    /// Drive a render engine through the scripted sequence, producing one
    /// frame per `FrameSpec`. Out-of-range page indices leave the slot
    /// empty (the engine tolerates null slots by design).
    pub fn run(&self) -> Vec<Frame> {
        let rect = PageRect::new(
            self.viewport.left,
            self.viewport.top,
            self.viewport.width,
            self.viewport.height,
            self.orientation,
        );
        let mut render = FlipRender::new(rect, self.orientation);
        let ids: Vec<PageId> = self
            .pages
            .iter()
            .map(|spec| render.add_page(spec.density))
            .collect();
        let id = |index: Option<usize>| index.and_then(|i| ids.get(i).copied());

        let mut frames = Vec::with_capacity(self.frames.len());
        for spec in &self.frames {
            render.direction = spec.direction;
            render.set_left_page(id(spec.left));
            render.set_right_page(id(spec.right));
            render.set_bottom_page(id(spec.bottom));

            match &spec.flipping {
                Some(flip) => {
                    if let Some(page) = ids.get(flip.page).copied() {
                        if render.flipping_page() != Some(page) {
                            render.end_flip();
                            render.begin_flip(page, flip.pose.clone());
                        } else {
                            render.set_flip_pose(flip.pose.clone());
                        }
                        if let Some(target) = render.page_mut(page) {
                            if let Some(side) = flip.side {
                                target.set_side(side);
                            }
                            if let Some(angle) = flip.hard_angle {
                                target.set_hard_angle(angle);
                            }
                        }
                    }
                }
                None => render.end_flip(),
            }

            // The descriptor is replaced wholesale every tick.
            render.shadow = spec.shadow;

            frames.push(render.produce_frame());
        }
        frames
    }
}
