//! Binary-side orchestration: configuration, terminal setup, progress and
//! the run itself.

pub(crate) mod config;
pub(crate) mod progress;
pub(crate) mod runtime;
pub(crate) mod terminal;
