//! Render engine — the frame assembler.
//!
//! Holds the current pose (direction, orientation, shadow descriptor, page
//! rectangle, slot assignments) and derives every visual primitive from it
//! on each `produce_frame` call. Nothing is carried over between frames;
//! the only memo is the saved-transform cache for static placements, and
//! its invalidation is explicit.
//!
//! The engine understands slots, stacking and shadows. It never deals
//! with any output device — a presentation backend consumes the `Frame`s.

mod cache;
mod shadow;

use std::collections::BTreeMap;

use crate::page::{Draw, FlipPose, Page, StaticPage};
use crate::types::{
    Frame, FlipDirection, Orientation, PageDensity, PageId, PageRect, PageSide, PageStyle, Shadow,
    ShadowSet,
};

use cache::TransformCache;

// Stacking offsets above the backend-provided base.
pub(crate) const Z_STATIC: i32 = 1;
pub(crate) const Z_BOTTOM: i32 = 3;
pub(crate) const Z_BACK_FACE: i32 = 4;
pub(crate) const Z_FLIPPING: i32 = 5;
pub(crate) const Z_HARD_SHADOW: i32 = 5;
pub(crate) const Z_SOFT_SHADOW: i32 = 10;

/// The flip geometry and shadow-compositing engine.
///
/// An external animation driver mutates the pose state between ticks
/// (slot setters, `direction`, `shadow`, flip pose) and calls
/// `produce_frame` once per tick. Styles within a frame apply in order;
/// a page occupying two slots takes the later style.
pub struct FlipRender {
    pages: BTreeMap<PageId, Page>,
    next_id: usize,

    left: Option<PageId>,
    right: Option<PageId>,
    bottom: Option<PageId>,
    flipping: Option<PageId>,

    /// Which way the current turn runs. Driver-mutable.
    pub direction: FlipDirection,
    /// Current shadow descriptor; `None` while no page is turning.
    /// Driver-mutable, replaced wholesale on every progress change.
    pub shadow: Option<Shadow>,

    orientation: Orientation,
    rect: PageRect,
    z_base: i32,
    cache: TransformCache,
}

impl FlipRender {
    pub fn new(rect: PageRect, orientation: Orientation) -> Self {
        FlipRender {
            pages: BTreeMap::new(),
            next_id: 0,
            left: None,
            right: None,
            bottom: None,
            flipping: None,
            direction: FlipDirection::Forward,
            shadow: None,
            orientation,
            rect,
            z_base: 0,
            cache: TransformCache::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Registry
    // -----------------------------------------------------------------------

    /// Register a new managed page and return its stable identity.
    pub fn add_page(&mut self, density: PageDensity) -> PageId {
        let id = PageId(self.next_id);
        self.next_id += 1;
        self.pages.insert(id, Page::Static(StaticPage::new(id, density)));
        id
    }

    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.get(&id)
    }

    pub fn page_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.get_mut(&id)
    }

    // -----------------------------------------------------------------------
    // Slot setters
    // -----------------------------------------------------------------------
    //
    // Every setter synchronously invalidates the outgoing page's saved
    // transform when the identity changes, so a later frame can never
    // replay a placement that belonged to a different slot assignment.

    pub fn set_left_page(&mut self, page: Option<PageId>) {
        if self.left != page {
            if let Some(old) = self.left {
                self.cache.invalidate(old);
            }
        }
        self.left = page;
        self.assign_side(page, PageSide::Left);
    }

    pub fn set_right_page(&mut self, page: Option<PageId>) {
        if self.right != page {
            if let Some(old) = self.right {
                self.cache.invalidate(old);
            }
        }
        self.right = page;
        self.assign_side(page, PageSide::Right);
    }

    pub fn set_bottom_page(&mut self, page: Option<PageId>) {
        if self.bottom != page {
            if let Some(old) = self.bottom {
                self.cache.invalidate(old);
            }
        }
        self.bottom = page;
    }

    pub fn set_flipping_page(&mut self, page: Option<PageId>) {
        if self.flipping != page {
            if let Some(old) = self.flipping {
                self.cache.invalidate(old);
            }
        }
        self.flipping = page;
    }

    pub fn left_page(&self) -> Option<PageId> {
        self.left
    }

    pub fn right_page(&self) -> Option<PageId> {
        self.right
    }

    pub fn bottom_page(&self) -> Option<PageId> {
        self.bottom
    }

    pub fn flipping_page(&self) -> Option<PageId> {
        self.flipping
    }

    fn assign_side(&mut self, page: Option<PageId>, side: PageSide) {
        let Some(id) = page else { return };
        let Some(p) = self.pages.get_mut(&id) else { return };
        if p.side() != Some(side) {
            // Orientation change: any saved placement is stale.
            p.set_side(side);
            self.cache.invalidate(id);
        }
    }

    // -----------------------------------------------------------------------
    // Flip lifecycle
    // -----------------------------------------------------------------------

    /// Promote `id` to the flipping variant and place it in the flipping
    /// slot. The flipping page supersedes whichever static slot it is
    /// animating out of, and its saved transform is dropped: the page
    /// changes role.
    pub fn begin_flip(&mut self, id: PageId, pose: FlipPose) {
        if let Some(page) = self.pages.remove(&id) {
            self.pages.insert(id, page.into_flipping(pose));
        }
        if self.left == Some(id) {
            self.set_left_page(None);
        }
        if self.right == Some(id) {
            self.set_right_page(None);
        }
        self.set_flipping_page(Some(id));
        self.cache.invalidate(id);
    }

    /// Update the animated pose of the page currently flipping.
    pub fn set_flip_pose(&mut self, pose: FlipPose) {
        if let Some(id) = self.flipping {
            if let Some(page) = self.pages.get_mut(&id) {
                page.set_pose(pose);
            }
        }
    }

    /// Settle the flipping page back to a static one, empty the flipping
    /// slot and drop the shadow descriptor.
    pub fn end_flip(&mut self) {
        if let Some(id) = self.flipping.take() {
            if let Some(page) = self.pages.remove(&id) {
                self.pages.insert(id, page.settle());
            }
            self.cache.invalidate(id);
        }
        self.shadow = None;
    }

    // -----------------------------------------------------------------------
    // Layout inputs
    // -----------------------------------------------------------------------

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Replace the page rectangle after a viewport change. Every saved
    /// placement depends on the rect, so the whole cache goes.
    pub fn set_rect(&mut self, rect: PageRect) {
        self.rect = rect;
        self.cache.clear();
    }

    pub fn rect(&self) -> &PageRect {
        &self.rect
    }

    /// Base stacking order provided by the layout collaborator.
    pub fn set_z_base(&mut self, z_base: i32) {
        self.z_base = z_base;
    }

    /// Re-apply sides to the current left/right pages and drop their saved
    /// transforms. Call after any layout or orientation change.
    pub fn update(&mut self) {
        if let Some(id) = self.left {
            self.cache.invalidate(id);
            if let Some(page) = self.pages.get_mut(&id) {
                page.set_side(PageSide::Left);
            }
        }
        if let Some(id) = self.right {
            self.cache.invalidate(id);
            if let Some(page) = self.pages.get_mut(&id) {
                page.set_side(PageSide::Right);
            }
        }
    }

    /// Drop the shadow descriptor; all four shadow primitives render
    /// hidden from the next frame on.
    pub fn clear_shadow(&mut self) {
        self.shadow = None;
    }

    // -----------------------------------------------------------------------
    // Frame assembly
    // -----------------------------------------------------------------------

    /// Produce the next frame. Runs every pass on every call; nothing is
    /// memoized across frames except cached static placements.
    pub fn produce_frame(&mut self) -> Frame {
        let mut frame = Frame {
            pages: Vec::with_capacity(self.pages.len()),
            shadows: ShadowSet::hidden(),
        };

        self.clear_pass(&mut frame);
        self.draw_left(&mut frame);
        self.draw_right(&mut frame);
        self.draw_bottom(&mut frame);
        self.draw_flipping(&mut frame);
        self.shadow_pass(&mut frame);

        frame
    }

    /// Hide every managed page that occupies no tracked slot: neutral
    /// stacking order, identity transform. This is what guarantees no
    /// ghost page survives a slot reassignment.
    fn clear_pass(&self, frame: &mut Frame) {
        for &id in self.pages.keys() {
            let tracked = self.left == Some(id)
                || self.right == Some(id)
                || self.bottom == Some(id)
                || self.flipping == Some(id);
            if !tracked {
                frame.pages.push(PageStyle::hidden(id, self.z_base));
            }
        }
    }

    /// Density and hard angle of the page currently flipping, if any.
    fn flipping_info(&self) -> Option<(PageDensity, f64)> {
        self.flipping
            .and_then(|id| self.pages.get(&id))
            .map(|p| (p.drawing_density(), p.hard_angle()))
    }

    fn draw_left(&mut self, frame: &mut Frame) {
        let Some(id) = self.left else { return };

        // In portrait the left page is off-stage. Drop its saved transform
        // so nothing leaks on the next portrait → landscape switch, and
        // hide it rather than leaving its last style in force.
        if self.orientation == Orientation::Portrait {
            self.cache.invalidate(id);
            frame.pages.push(PageStyle::hidden(id, self.z_base));
            return;
        }

        // While a hard page flips backwards, the left page is the rigid
        // page's back face: it mirrors the flip rotation and stacks above
        // the static pages.
        if self.direction == FlipDirection::Back {
            if let Some((PageDensity::Hard, flip_angle)) = self.flipping_info() {
                if self.bottom == Some(id) {
                    // Same identity as the page being revealed: it is
                    // being replaced, so its saved state must go.
                    self.cache.invalidate(id);
                }
                if let Some(page) = self.pages.get_mut(&id) {
                    page.set_hard_angle(180.0 + flip_angle);
                    let mut style = page.draw(Some(PageDensity::Hard), &self.rect);
                    style.z_order = self.z_base + Z_BACK_FACE;
                    frame.pages.push(style);
                }
                return;
            }
        }

        self.draw_static_slot(id, PageSide::Left, frame);
    }

    fn draw_right(&mut self, frame: &mut Frame) {
        let Some(id) = self.right else { return };

        // Mirror of the left slot: on a forward hard flip the right page
        // is the rigid page's back face.
        if self.direction == FlipDirection::Forward {
            if let Some((PageDensity::Hard, flip_angle)) = self.flipping_info() {
                if self.bottom == Some(id) {
                    self.cache.invalidate(id);
                }
                if let Some(page) = self.pages.get_mut(&id) {
                    page.set_hard_angle(180.0 + flip_angle);
                    let mut style = page.draw(Some(PageDensity::Hard), &self.rect);
                    style.z_order = self.z_base + Z_BACK_FACE;
                    frame.pages.push(style);
                }
                return;
            }
        }

        self.draw_static_slot(id, PageSide::Right, frame);
    }

    fn draw_bottom(&mut self, frame: &mut Frame) {
        let Some(id) = self.bottom else { return };

        // In portrait a backwards turn fully occludes the revealed page.
        if self.orientation == Orientation::Portrait && self.direction == FlipDirection::Back {
            frame.pages.push(PageStyle::hidden(id, self.z_base));
            return;
        }

        // Render at the flipping page's density so the revealed page stays
        // consistent with what is curling above it.
        let density = self.flipping_info().map(|(density, _)| density);
        if let Some(page) = self.pages.get(&id) {
            let mut style = page.draw(density, &self.rect);
            style.z_order = self.z_base + Z_BOTTOM;
            frame.pages.push(style);
        }
    }

    fn draw_flipping(&mut self, frame: &mut Frame) {
        let Some(id) = self.flipping else { return };
        if let Some(page) = self.pages.get(&id) {
            let mut style = page.draw(None, &self.rect);
            style.z_order = self.z_base + Z_FLIPPING;
            frame.pages.push(style);
        }
    }

    /// Static placement with the saved-transform cache in front.
    fn draw_static_slot(&mut self, id: PageId, side: PageSide, frame: &mut Frame) {
        if let Some(saved) = self.cache.get(id) {
            frame.pages.push(saved.clone());
            return;
        }
        if let Some(page) = self.pages.get(&id) {
            let mut style = page.simple_draw(side, &self.rect);
            style.z_order = self.z_base + Z_STATIC;
            self.cache.save(id, style.clone());
            frame.pages.push(style);
        }
    }

    fn shadow_pass(&self, frame: &mut Frame) {
        let Some(descriptor) = self.shadow else { return };
        let Some((density, _)) = self.flipping_info() else { return };

        // Exactly one pair is ever visible; the other stays hidden.
        match density {
            PageDensity::Soft => {
                frame.shadows.outer =
                    shadow::soft_outer(&descriptor, &self.rect, self.direction, self.z_base);
                frame.shadows.inner =
                    shadow::soft_inner(&descriptor, &self.rect, self.direction, self.z_base);
            }
            PageDensity::Hard => {
                frame.shadows.hard_outer =
                    shadow::hard_outer(&descriptor, &self.rect, self.direction, self.z_base);
                frame.shadows.hard_inner =
                    shadow::hard_inner(&descriptor, &self.rect, self.direction, self.z_base);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PageTransform, Point};

    fn engine(orientation: Orientation) -> FlipRender {
        let rect = PageRect::new(0.0, 0.0, 800.0, 600.0, orientation);
        FlipRender::new(rect, orientation)
    }

    fn descriptor() -> Shadow {
        Shadow {
            pos: Point::new(500.0, 300.0),
            angle: 0.2,
            progress: 50.0,
            opacity: 0.5,
            width: 200.0,
        }
    }

    fn visible_ids(frame: &Frame) -> Vec<(PageId, bool)> {
        frame.pages.iter().map(|s| (s.page, s.visible)).collect()
    }

    #[test]
    fn clear_pass_hides_untracked_pages_and_is_idempotent() {
        let mut engine = engine(Orientation::Landscape);
        let a = engine.add_page(PageDensity::Soft);
        let b = engine.add_page(PageDensity::Soft);
        let c = engine.add_page(PageDensity::Soft);
        engine.set_left_page(Some(a));
        engine.set_right_page(Some(b));

        let first = engine.produce_frame();
        let second = engine.produce_frame();
        assert_eq!(visible_ids(&first), visible_ids(&second));

        let hidden: Vec<_> = first.pages.iter().filter(|s| !s.visible).collect();
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].page, c);
        assert_eq!(hidden[0].transform, PageTransform::Identity);
    }

    #[test]
    fn every_managed_page_gets_a_style_each_frame() {
        let mut engine = engine(Orientation::Landscape);
        let ids = [
            engine.add_page(PageDensity::Soft),
            engine.add_page(PageDensity::Soft),
            engine.add_page(PageDensity::Hard),
        ];
        engine.set_right_page(Some(ids[1]));

        let frame = engine.produce_frame();
        for id in ids {
            assert!(
                frame.pages.iter().any(|s| s.page == id),
                "page {id:?} missing from frame"
            );
        }
    }

    #[test]
    fn slot_reassignment_invalidates_the_outgoing_page_once() {
        let mut engine = engine(Orientation::Landscape);
        let a = engine.add_page(PageDensity::Soft);
        let b = engine.add_page(PageDensity::Soft);

        engine.set_left_page(Some(a));
        engine.produce_frame();
        assert!(engine.cache.get(a).is_some(), "static draw should cache");

        engine.set_left_page(Some(b));
        assert!(engine.cache.get(a).is_none(), "outgoing page not invalidated");

        // Re-seed and repeat the same assignment: no second invalidation.
        let saved = PageStyle::hidden(a, 0);
        engine.cache.save(a, saved.clone());
        engine.set_left_page(Some(b));
        assert_eq!(engine.cache.get(a), Some(&saved));
    }

    #[test]
    fn reassigning_sides_drops_the_incoming_pages_saved_placement() {
        let mut engine = engine(Orientation::Landscape);
        let a = engine.add_page(PageDensity::Soft);

        engine.set_right_page(Some(a));
        engine.produce_frame();
        assert!(engine.cache.get(a).is_some());

        // Same page moves to the other side: the saved placement is stale.
        engine.set_right_page(None);
        engine.set_left_page(Some(a));
        assert!(engine.cache.get(a).is_none());
    }

    #[test]
    fn portrait_left_slot_always_skips_and_invalidates() {
        for direction in [FlipDirection::Forward, FlipDirection::Back] {
            let mut engine = engine(Orientation::Portrait);
            let a = engine.add_page(PageDensity::Hard);
            engine.set_left_page(Some(a));
            engine.direction = direction;
            engine.cache.save(a, PageStyle::hidden(a, 0));

            let frame = engine.produce_frame();
            let style = frame.pages.iter().find(|s| s.page == a).unwrap();
            assert!(!style.visible);
            assert!(engine.cache.get(a).is_none());
        }
    }

    #[test]
    fn bottom_slot_skips_only_in_portrait_back() {
        let cases = [
            (Orientation::Landscape, FlipDirection::Forward, true),
            (Orientation::Landscape, FlipDirection::Back, true),
            (Orientation::Portrait, FlipDirection::Forward, true),
            (Orientation::Portrait, FlipDirection::Back, false),
        ];
        for (orientation, direction, drawn) in cases {
            let mut engine = engine(orientation);
            let a = engine.add_page(PageDensity::Soft);
            engine.set_bottom_page(Some(a));
            engine.direction = direction;

            let frame = engine.produce_frame();
            let style = frame.pages.iter().find(|s| s.page == a).unwrap();
            assert_eq!(
                style.visible, drawn,
                "bottom slot in {orientation:?}/{direction:?}"
            );
        }
    }

    #[test]
    fn hard_back_flip_drives_the_left_page_as_back_face() {
        let mut engine = engine(Orientation::Landscape);
        let left = engine.add_page(PageDensity::Hard);
        let turning = engine.add_page(PageDensity::Hard);
        engine.set_left_page(Some(left));
        engine.direction = FlipDirection::Back;
        engine.begin_flip(turning, FlipPose::default());
        if let Some(page) = engine.page_mut(turning) {
            page.set_hard_angle(-60.0);
        }

        let frame = engine.produce_frame();
        let style = frame.pages.iter().find(|s| s.page == left).unwrap();
        assert_eq!(style.z_order, Z_BACK_FACE);
        match style.transform {
            PageTransform::Hard { angle_deg, .. } => assert_eq!(angle_deg, 120.0),
            ref other => panic!("expected hard transform, got {other:?}"),
        }
        // The rigid mirror wrote through to the page state.
        assert_eq!(engine.page(left).unwrap().hard_angle(), 120.0);
    }

    #[test]
    fn soft_back_flip_leaves_the_left_page_static() {
        let mut engine = engine(Orientation::Landscape);
        let left = engine.add_page(PageDensity::Hard);
        let turning = engine.add_page(PageDensity::Soft);
        engine.set_left_page(Some(left));
        engine.direction = FlipDirection::Back;
        engine.begin_flip(turning, FlipPose::default());

        let frame = engine.produce_frame();
        let style = frame.pages.iter().find(|s| s.page == left).unwrap();
        assert_eq!(style.z_order, Z_STATIC);
        assert_eq!(style.transform, PageTransform::Identity);
    }

    #[test]
    fn bottom_page_inherits_the_flipping_density() {
        let mut engine = engine(Orientation::Landscape);
        let bottom = engine.add_page(PageDensity::Soft);
        let turning = engine.add_page(PageDensity::Hard);
        engine.set_bottom_page(Some(bottom));
        engine.begin_flip(turning, FlipPose::default());

        let frame = engine.produce_frame();
        let style = frame.pages.iter().find(|s| s.page == bottom).unwrap();
        assert_eq!(style.z_order, Z_BOTTOM);
        assert!(matches!(style.transform, PageTransform::Hard { .. }));
    }

    #[test]
    fn flipping_page_stacks_on_top() {
        let mut engine = engine(Orientation::Landscape);
        let turning = engine.add_page(PageDensity::Soft);
        engine.begin_flip(turning, FlipPose::default());

        let frame = engine.produce_frame();
        let style = frame.pages.iter().find(|s| s.page == turning).unwrap();
        assert_eq!(style.z_order, Z_FLIPPING);
        assert!(matches!(style.transform, PageTransform::Soft { .. }));
    }

    #[test]
    fn flipping_page_supersedes_its_static_slot() {
        let mut engine = engine(Orientation::Landscape);
        let a = engine.add_page(PageDensity::Soft);
        engine.set_right_page(Some(a));
        engine.begin_flip(a, FlipPose::default());

        assert_eq!(engine.right_page(), None);
        let frame = engine.produce_frame();
        let styles: Vec<_> = frame.pages.iter().filter(|s| s.page == a).collect();
        assert_eq!(styles.len(), 1);
        assert_eq!(styles[0].z_order, Z_FLIPPING);
    }

    #[test]
    fn shadow_pairs_are_mutually_exclusive() {
        for (density, soft_visible) in [(PageDensity::Soft, true), (PageDensity::Hard, false)] {
            let mut engine = engine(Orientation::Landscape);
            let turning = engine.add_page(density);
            engine.begin_flip(turning, FlipPose::default());
            engine.shadow = Some(descriptor());

            let frame = engine.produce_frame();
            assert_eq!(frame.shadows.outer.visible, soft_visible);
            assert_eq!(frame.shadows.inner.visible, soft_visible);
            assert_eq!(frame.shadows.hard_outer.visible, !soft_visible);
            assert_eq!(frame.shadows.hard_inner.visible, !soft_visible);
        }
    }

    #[test]
    fn no_shadow_without_a_flipping_page() {
        let mut engine = engine(Orientation::Landscape);
        let a = engine.add_page(PageDensity::Soft);
        engine.set_right_page(Some(a));
        engine.shadow = Some(descriptor());

        let frame = engine.produce_frame();
        assert_eq!(frame.shadows, ShadowSet::hidden());
    }

    #[test]
    fn clear_shadow_hides_all_four_primitives() {
        let mut engine = engine(Orientation::Landscape);
        let turning = engine.add_page(PageDensity::Soft);
        engine.begin_flip(turning, FlipPose::default());
        engine.shadow = Some(descriptor());
        assert!(engine.produce_frame().shadows.outer.visible);

        engine.clear_shadow();
        assert_eq!(engine.produce_frame().shadows, ShadowSet::hidden());
    }

    #[test]
    fn cached_static_placement_is_replayed_until_invalidated() {
        let mut engine = engine(Orientation::Landscape);
        let a = engine.add_page(PageDensity::Soft);
        engine.set_right_page(Some(a));

        let first = engine.produce_frame();
        let second = engine.produce_frame();
        let style =
            |f: &Frame| f.pages.iter().find(|s| s.page == a).cloned().unwrap();
        assert_eq!(style(&first), style(&second));

        // A layout change drops the cache and placements follow the rect.
        engine.set_rect(PageRect::new(
            0.0,
            0.0,
            1000.0,
            700.0,
            Orientation::Landscape,
        ));
        engine.update();
        let third = engine.produce_frame();
        assert_eq!(style(&third).position, Point::new(500.0, 0.0));
    }

    #[test]
    fn end_flip_settles_the_page_and_drops_the_shadow() {
        let mut engine = engine(Orientation::Landscape);
        let turning = engine.add_page(PageDensity::Hard);
        engine.begin_flip(turning, FlipPose::default());
        engine.shadow = Some(descriptor());
        engine.produce_frame();

        engine.end_flip();
        assert_eq!(engine.flipping_page(), None);
        assert!(engine.shadow.is_none());
        assert!(matches!(engine.page(turning), Some(Page::Static(_))));
    }

    #[test]
    fn empty_slots_are_tolerated() {
        let mut engine = engine(Orientation::Landscape);
        engine.shadow = Some(descriptor());
        let frame = engine.produce_frame();
        assert!(frame.pages.is_empty());
        assert_eq!(frame.shadows, ShadowSet::hidden());
    }
}
