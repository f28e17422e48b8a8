//! Terminal-facing UI facade.
//!
//! `render` holds the drawing contract, `display` the spinner / live region /
//! final panel orchestration built on top of it.

pub mod display;
pub mod render;
