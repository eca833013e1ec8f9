//! Schedule model for the task assignment problem
//!
//! - [`Resource`]: problem fact, identified by its unique name
//! - [`Task`]: planning entity, its `resource` field is what the solver assigns
//! - [`Schedule`]: the planning solution, replaced wholesale on every fetch
//!
//! Tasks reference resources by name rather than by pointer, so removing a
//! resource never leaves a dangling reference: lookups simply miss, and the
//! local edit operations in [`edit`] reset such references to `None`.

mod edit;
mod resource;
mod schedule;
mod task;


pub use edit::{NewTask, ReferentialIntegrityWarning};
pub use resource::Resource;
pub use schedule::{Schedule, SolverStatus};
pub use task::Task;
