//! Task dispatch modules.

pub mod runner;

pub use runner::{run_tasks, RunOptions};
