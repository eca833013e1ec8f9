//! Terminal front end for the TaskForge solving session.
//!
//! - [`console`]: colored `tracing` output and logging setup
//! - [`display`]: styled rendering of schedules, analyses and notifications
//! - [`args`]: parsing of inline resource and weight arguments

pub mod args;
pub mod console;
pub mod display;
