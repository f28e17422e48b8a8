//! Binary-local application orchestration.
//!
//! `startup` resolves config and connects the chosen transport; `entry` runs
//! the session and persists history on the way out.

pub(crate) mod entry;
pub(crate) mod startup;
