//! Streaming-event reduction engine.
//!
//! - `sanitize`: protocol-envelope stripping for text fragments.
//! - `plan`: execution-plan payload formatting.
//! - `tool_notice`: one-line tool notification summaries.
//! - `structured`: classification of the finished answer.
//! - `accumulator`: the per-turn event router and phase machine.
//! - `turn`: drives one turn against a transport and a display.

pub mod accumulator;
pub mod plan;
pub mod sanitize;
pub mod structured;
pub mod tool_notice;
pub mod turn;

pub use accumulator::TurnAccumulator;
pub use structured::{InputField, InputMetadata, ParsedAnswer};
pub use turn::run_turn;
