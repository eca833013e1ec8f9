//! Shared test fixtures for TaskForge crates.
//!
//! This crate provides data and pure helpers for testing. It only depends on
//! `taskforge-core`, so every other crate can use it as a dev-dependency.
//!
//! - [`demo_data`] - The SMALL and MEDIUM datasets served by the solver service
//! - [`builder`] - Compact construction of ad hoc schedules
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! taskforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```
//! use taskforge_test::demo_data::{generate, DemoData};
//! use taskforge_test::ScheduleBuilder;
//!
//! let small = generate(DemoData::Small);
//! assert_eq!(small.tasks.len(), 10);
//!
//! let schedule = ScheduleBuilder::new()
//!     .resource("A", 60, &["x"])
//!     .assigned_task("t1", 40, "x", "A")
//!     .build();
//! assert_eq!(schedule.violation_count(), 0);
//! ```

pub mod builder;
pub mod demo_data;

pub use builder::ScheduleBuilder;
pub use demo_data::DemoData;
