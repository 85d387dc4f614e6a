//! CLI command implementations.

pub mod args;
pub mod output;

pub mod apply;
pub mod reorder;
pub mod scan;
pub mod show;

pub use args::{Cli, Commands};
pub use output::Output;
