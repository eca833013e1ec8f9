//! Demo datasets.
//!
//! Mirrors the datasets the quickstart solver service offers at
//! `GET /demo-data`, so client tests can serve the same shapes.
//!
//! # Example
//!
//! ```
//! use taskforge_test::demo_data::{generate, DemoData};
//!
//! let medium = generate(DemoData::Medium);
//! assert_eq!(medium.resources.len(), 5);
//! assert!(medium.tasks.iter().all(|t| t.resource.is_none()));
//! ```

use std::fmt;

use taskforge_core::{Resource, Schedule, Task};

/// Available demo datasets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DemoData {
    Small,
    Medium,
}

impl DemoData {
    pub const ALL: [DemoData; 2] = [DemoData::Small, DemoData::Medium];

    /// The dataset id used on the wire.
    pub fn id(self) -> &'static str {
        match self {
            DemoData::Small => "SMALL",
            DemoData::Medium => "MEDIUM",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.id() == id)
    }
}

impl fmt::Display for DemoData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Ids of all datasets, in listing order.
pub fn dataset_ids() -> Vec<String> {
    DemoData::ALL.iter().map(|d| d.id().to_string()).collect()
}

/// Generates a dataset. Tasks are unassigned and the schedule is unscored.
pub fn generate(dataset: DemoData) -> Schedule {
    match dataset {
        DemoData::Small => small(),
        DemoData::Medium => medium(),
    }
}

/// Looks up a dataset by wire id.
pub fn by_id(id: &str) -> Option<Schedule> {
    DemoData::from_id(id).map(generate)
}

/// 3 resources, 10 tasks.
fn small() -> Schedule {
    let resources = vec![
        Resource::new("Alice", 100, ["python", "sql"]),
        Resource::new("Bob", 120, ["python", "java"]),
        Resource::new("Charlie", 80, ["sql", "java"]),
    ];

    let tasks = vec![
        Task::new("task-1", "Data Pipeline", 30, "python"),
        Task::new("task-2", "API Development", 45, "python"),
        Task::new("task-3", "Database Schema", 20, "sql"),
        Task::new("task-4", "Query Optimization", 35, "sql"),
        Task::new("task-5", "Backend Service", 50, "java"),
        Task::new("task-6", "Data Analysis", 25, "python"),
        Task::new("task-7", "Report Generation", 15, "sql"),
        Task::new("task-8", "Integration Tests", 40, "java"),
        Task::new("task-9", "Code Review", 20, ""),
        Task::new("task-10", "Documentation", 15, ""),
    ];

    Schedule::new(resources, tasks)
}

/// 5 resources, 25 tasks. Total capacity 700 against roughly 675 of work.
fn medium() -> Schedule {
    let resources = vec![
        Resource::new("Alice", 150, ["python", "sql", "ml"]),
        Resource::new("Bob", 140, ["python", "java", "devops"]),
        Resource::new("Charlie", 130, ["sql", "java", "frontend"]),
        Resource::new("Diana", 160, ["python", "ml", "devops"]),
        Resource::new("Eve", 120, ["frontend", "java", "sql"]),
    ];

    const SKILLS: [&str; 7] = ["python", "sql", "java", "ml", "devops", "frontend", ""];
    let tasks = (0..25u32)
        .map(|i| {
            Task::new(
                format!("task-{}", i + 1),
                format!("Task {}", i + 1),
                15 + (i * 3) % 25,
                SKILLS[i as usize % SKILLS.len()],
            )
        })
        .collect();

    Schedule::new(resources, tasks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_dataset() {
        let schedule = generate(DemoData::Small);
        assert_eq!(schedule.resources.len(), 3);
        assert_eq!(schedule.tasks.len(), 10);
        assert!(schedule.score.is_none());
        assert!(!schedule.is_solving());
        assert_eq!(schedule.tasks[8].required_skill(), None);
    }

    #[test]
    fn test_medium_dataset() {
        let schedule = generate(DemoData::Medium);
        assert_eq!(schedule.tasks.len(), 25);
        let capacity: u32 = schedule.resources.iter().map(|r| r.capacity).sum();
        assert_eq!(capacity, 700);
        assert!(schedule.tasks.iter().all(|t| (15..40).contains(&t.duration)));
        assert_eq!(schedule.tasks[6].required_skill(), None);
    }

    #[test]
    fn test_ids() {
        assert_eq!(dataset_ids(), vec!["SMALL", "MEDIUM"]);
        assert_eq!(DemoData::from_id("MEDIUM"), Some(DemoData::Medium));
        assert!(by_id("LARGE").is_none());
    }
}
