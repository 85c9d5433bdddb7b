//! pageturn — a page-flip geometry and shadow-compositing engine.
//!
//! Given an animation progress, a flip direction, a page density and a
//! viewport orientation, the engine derives which pages are visible and in
//! what role, the transform and clip polygon of the page being turned, and
//! the shadow geometry that sells the illusion of a bending sheet. The
//! output is a structured [`types::Frame`]; turning it into pixels is a
//! presentation backend's job, and advancing the animation is an external
//! driver's.

pub mod geometry;
pub mod page;
pub mod render;
pub mod script;
pub mod types;
