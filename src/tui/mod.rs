//! Terminal rendering building blocks.
//!
//! Layout math (`text`, `dashboard`), markdown conversion, the spinner
//! handoff, and the stateful crossterm `Renderer` live in separate modules so
//! they can be tested without a terminal.

pub mod dashboard;
pub mod markdown;
pub mod progress;
pub mod renderer;
pub mod settings;
pub mod text;

pub use renderer::Renderer;
