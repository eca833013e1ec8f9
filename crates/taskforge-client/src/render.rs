//! Presentation model of a schedule.
//!
//! [`render`] is a pure function of the schedule and the weight registry.
//! Front ends style the resulting [`ScheduleView`]; its `Display` impl is a
//! plain-text fallback.

use std::fmt;

use taskforge_core::{format_score, ConstraintKey, ConstraintType, ConstraintWeights, Schedule};

/// Headline numbers shown above the schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Kpis {
    pub score: String,
    pub feasible: Option<bool>,
    pub solving: bool,
    pub total_tasks: usize,
    pub assigned_tasks: usize,
    pub unassigned_tasks: usize,
    /// Locally counted violations. Approximate; the server score is
    /// authoritative.
    pub violations: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub id: String,
    pub name: String,
    pub duration: u32,
    pub required_skill: Option<String>,
    /// False when the assigned resource lacks the required skill.
    pub skill_ok: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRow {
    pub name: String,
    pub capacity: u32,
    pub skills: Vec<String>,
    pub load: u64,
    pub utilization: f64,
    pub overloaded: bool,
    pub tasks: Vec<TaskRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightRow {
    pub key: ConstraintKey,
    pub constraint_type: ConstraintType,
    pub weight: i32,
    pub is_default: bool,
}

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleView {
    /// `None` when no dataset is loaded.
    pub kpis: Option<Kpis>,
    pub resources: Vec<ResourceRow>,
    pub unassigned: Vec<TaskRow>,
    pub weights: Vec<WeightRow>,
}

impl ScheduleView {
    pub fn is_empty(&self) -> bool {
        self.kpis.is_none()
    }
}

/// Builds the view for `schedule` with the current `weights`.
pub fn render(schedule: Option<&Schedule>, weights: &ConstraintWeights) -> ScheduleView {
    let weights = weights
        .iter()
        .map(|(key, weight)| WeightRow {
            key,
            constraint_type: key.constraint_type(),
            weight,
            is_default: weight == key.default_weight(),
        })
        .collect();

    let Some(schedule) = schedule else {
        return ScheduleView {
            kpis: None,
            resources: Vec::new(),
            unassigned: Vec::new(),
            weights,
        };
    };

    let metrics = schedule.metrics();
    let kpis = Kpis {
        score: format_score(schedule.score.as_ref()),
        feasible: schedule.score.map(|s| s.is_feasible()),
        solving: schedule.is_solving(),
        total_tasks: metrics.total_tasks,
        assigned_tasks: metrics.assigned_tasks,
        unassigned_tasks: metrics.unassigned_tasks(),
        violations: metrics.violation_count(),
    };

    let resources = schedule
        .resources
        .iter()
        .zip(&metrics.resources)
        .map(|(resource, load)| ResourceRow {
            name: resource.name.clone(),
            capacity: resource.capacity,
            skills: resource.skills.iter().cloned().collect(),
            load: load.load,
            utilization: load.utilization(),
            overloaded: load.is_overloaded(),
            tasks: schedule
                .tasks_of(&resource.name)
                .map(|task| TaskRow {
                    id: task.id.clone(),
                    name: task.name.clone(),
                    duration: task.duration,
                    required_skill: task.required_skill().map(str::to_string),
                    skill_ok: task.is_skill_satisfied_by(resource),
                })
                .collect(),
        })
        .collect();

    let unassigned = schedule
        .tasks
        .iter()
        .filter(|task| schedule.assigned_resource(task).is_none())
        .map(|task| TaskRow {
            id: task.id.clone(),
            name: task.name.clone(),
            duration: task.duration,
            required_skill: task.required_skill().map(str::to_string),
            skill_ok: true,
        })
        .collect();

    ScheduleView {
        kpis: Some(kpis),
        resources,
        unassigned,
        weights,
    }
}

impl fmt::Display for ScheduleView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(kpis) = &self.kpis else {
            return writeln!(f, "No dataset loaded");
        };

        writeln!(
            f,
            "Score {}{} | {} of {} tasks assigned | {} violations",
            kpis.score,
            if kpis.solving { " (solving)" } else { "" },
            kpis.assigned_tasks,
            kpis.total_tasks,
            kpis.violations,
        )?;

        for row in &self.resources {
            writeln!(
                f,
                "{} [{}/{}, {:.0}%]{}",
                row.name,
                row.load,
                row.capacity,
                row.utilization * 100.0,
                if row.overloaded { " OVER CAPACITY" } else { "" },
            )?;
            for task in &row.tasks {
                write_task(f, task)?;
            }
        }

        if !self.unassigned.is_empty() {
            writeln!(f, "Unassigned")?;
            for task in &self.unassigned {
                write_task(f, task)?;
            }
        }
        Ok(())
    }
}

fn write_task(f: &mut fmt::Formatter<'_>, task: &TaskRow) -> fmt::Result {
    write!(f, "  {} {} ({})", task.id, task.name, task.duration)?;
    if let Some(skill) = &task.required_skill {
        write!(f, " needs {skill}")?;
        if !task.skill_ok {
            write!(f, " MISSING")?;
        }
    }
    writeln!(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskforge_core::{Resource, Score, Task};

    fn schedule() -> Schedule {
        let mut schedule = Schedule::new(
            vec![Resource::new("A", 60, ["x"]), Resource::new("B", 100, ["y"])],
            vec![
                Task::new("t1", "One", 40, "x").assigned_to("A"),
                Task::new("t2", "Two", 30, "y").assigned_to("A"),
                Task::new("t3", "Three", 10, ""),
            ],
        );
        schedule.score = Some(Score::of(-2, -15));
        schedule
    }

    #[test]
    fn test_render_empty() {
        let view = render(None, &ConstraintWeights::default());
        assert!(view.is_empty());
        assert_eq!(view.weights.len(), 4);
        assert!(view.weights.iter().all(|w| w.is_default));
        assert_eq!(view.to_string(), "No dataset loaded\n");
    }

    #[test]
    fn test_render_schedule() {
        let weights = ConstraintWeights::default().with(ConstraintKey::BalanceLoad, 0);
        let view = render(Some(&schedule()), &weights);

        let kpis = view.kpis.as_ref().unwrap();
        assert_eq!(kpis.score, "-2hard/-15soft");
        assert_eq!(kpis.feasible, Some(false));
        assert_eq!(kpis.total_tasks, 3);
        assert_eq!(kpis.assigned_tasks, 2);
        assert_eq!(kpis.unassigned_tasks, 1);
        assert_eq!(kpis.violations, 2);

        let a = &view.resources[0];
        assert_eq!(a.load, 70);
        assert!(a.overloaded);
        assert_eq!(a.tasks.len(), 2);
        assert!(a.tasks[0].skill_ok);
        assert!(!a.tasks[1].skill_ok);
        assert!(view.resources[1].tasks.is_empty());

        assert_eq!(view.unassigned.len(), 1);
        assert_eq!(view.unassigned[0].required_skill, None);

        let balance = view
            .weights
            .iter()
            .find(|w| w.key == ConstraintKey::BalanceLoad)
            .unwrap();
        assert_eq!(balance.weight, 0);
        assert!(!balance.is_default);

        let text = view.to_string();
        assert!(text.contains("A [70/60, 117%] OVER CAPACITY"));
        assert!(text.contains("t2 Two (30) needs y MISSING"));
    }

    #[test]
    fn test_task_pointing_at_missing_resource_is_unassigned() {
        let mut schedule = schedule();
        schedule
            .tasks
            .push(Task::new("t4", "Four", 5, "").assigned_to("Ghost"));
        let view = render(Some(&schedule), &ConstraintWeights::default());

        let kpis = view.kpis.as_ref().unwrap();
        assert_eq!(kpis.total_tasks, 4);
        assert_eq!(kpis.assigned_tasks, 2);
        assert_eq!(kpis.unassigned_tasks, 2);

        let ids: Vec<&str> = view.unassigned.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t3", "t4"]);
        assert!(view.resources.iter().all(|r| r.tasks.iter().all(|t| t.id != "t4")));
    }
}
