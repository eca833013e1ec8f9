//! Styled terminal rendering.

use std::fmt::Write as _;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use taskforge_client::render::{Kpis, ResourceRow, TaskRow};
use taskforge_client::{Notification, NotificationLevel, ScheduleView};
use taskforge_core::score::UNSCORED;
use taskforge_core::{format_score as score_text, ConstraintType, ScoreAnalysis};

use crate::console::format_score;

const RULE: &str = "──────────────────────────────────────────────────────────";

/// Renders a schedule view with colors.
pub fn schedule(view: &ScheduleView) -> String {
    let Some(kpis) = &view.kpis else {
        return "No dataset loaded".bright_black().to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", kpi_line(kpis));
    let _ = writeln!(out, "{}", RULE.bright_black());

    for row in &view.resources {
        let _ = writeln!(out, "{}", resource_line(row));
        for task in &row.tasks {
            let _ = writeln!(out, "{}", task_line(task));
        }
    }

    if !view.unassigned.is_empty() {
        let _ = writeln!(
            out,
            "{} {}",
            "Unassigned".bright_yellow().bold(),
            format!("({})", view.unassigned.len()).bright_black()
        );
        for task in &view.unassigned {
            let _ = writeln!(out, "{}", task_line(task));
        }
    }

    let _ = writeln!(out, "{}", RULE.bright_black());
    let weights: Vec<String> = view
        .weights
        .iter()
        .map(|w| {
            let value = w.weight.to_string();
            let value = if w.is_default {
                value.white().to_string()
            } else {
                value.bright_magenta().bold().to_string()
            };
            format!("{} {}", w.key.key().bright_black(), value)
        })
        .collect();
    let _ = write!(out, "{} {}", "Weights".white().bold(), weights.join(" │ "));
    out
}

fn kpi_line(kpis: &Kpis) -> String {
    let status = if kpis.solving {
        "SOLVING".bright_cyan().bold().to_string()
    } else {
        match kpis.feasible {
            Some(true) => "FEASIBLE".bright_green().bold().to_string(),
            Some(false) => "INFEASIBLE".bright_red().bold().to_string(),
            None => "UNSOLVED".bright_black().bold().to_string(),
        }
    };

    let violations = if kpis.violations == 0 {
        "0".bright_green().to_string()
    } else {
        kpis.violations
            .to_formatted_string(&Locale::en)
            .bright_red()
            .to_string()
    };

    format!(
        "{} {} │ {} │ {}/{} tasks assigned │ {} local violations",
        "Score".white().bold(),
        format_score(&kpis.score),
        status,
        kpis.assigned_tasks
            .to_formatted_string(&Locale::en)
            .bright_yellow(),
        kpis.total_tasks.to_formatted_string(&Locale::en),
        violations
    )
}

fn resource_line(row: &ResourceRow) -> String {
    let utilization = format!("{:>4.0}%", row.utilization * 100.0);
    let utilization = if row.overloaded {
        utilization.bright_red().bold().to_string()
    } else if row.utilization >= 0.9 {
        utilization.yellow().to_string()
    } else {
        utilization.bright_green().to_string()
    };

    format!(
        "{} {} {}/{} │ {}",
        row.name.bright_cyan().bold(),
        utilization,
        row.load.to_formatted_string(&Locale::en),
        row.capacity.to_formatted_string(&Locale::en),
        row.skills.join(", ").bright_black()
    )
}

fn task_line(task: &TaskRow) -> String {
    let skill = match &task.required_skill {
        Some(skill) if task.skill_ok => skill.white().to_string(),
        Some(skill) => format!("{} missing", skill).bright_red().to_string(),
        None => "-".bright_black().to_string(),
    };
    format!(
        "    {:<10} {:<24} {:>4} │ {}",
        task.id.bright_black(),
        task.name,
        task.duration,
        skill
    )
}

/// Renders a sorted score analysis.
pub fn analysis(analysis: &ScoreAnalysis) -> String {
    if analysis.constraints.is_empty() {
        return "No constraints reported".bright_black().to_string();
    }

    let mut out = String::new();
    for constraint in &analysis.constraints {
        let kind = match constraint.constraint_type() {
            ConstraintType::Hard => "HARD".bright_red().to_string(),
            ConstraintType::Soft => "SOFT".yellow().to_string(),
        };
        let icon = if constraint.is_violated_hard() {
            "✗".bright_red().bold().to_string()
        } else if constraint.score.is_zero() {
            "✓".bright_green().to_string()
        } else {
            "~".yellow().to_string()
        };
        let _ = writeln!(
            out,
            "{} {} {:<32} {} │ {} matches │ weight {}",
            icon,
            kind,
            constraint.name,
            format_score(&constraint.score.to_string()),
            constraint
                .match_count()
                .to_formatted_string(&Locale::en)
                .bright_yellow(),
            score_text(constraint.weight.as_ref()).bright_black()
        );
        for m in constraint.matches.iter().take(5) {
            let _ = writeln!(
                out,
                "    {} {}",
                m.score.as_deref().unwrap_or(UNSCORED).bright_black(),
                m.justification
            );
        }
        if constraint.matches.len() > 5 {
            let _ = writeln!(
                out,
                "    {}",
                format!("... {} more", constraint.matches.len() - 5).bright_black()
            );
        }
    }
    out.trim_end().to_string()
}

/// Renders a notification for stderr.
pub fn notification(notification: &Notification) -> String {
    let title = match notification.level {
        NotificationLevel::Info => notification.title.bright_blue().bold().to_string(),
        NotificationLevel::Warning => notification.title.bright_yellow().bold().to_string(),
        NotificationLevel::Error => notification.title.bright_red().bold().to_string(),
    };
    let mut out = format!("{} {}", title, notification.message);
    if let Some(info) = &notification.info {
        if let Some(code) = &info.code {
            let _ = write!(out, " {}", format!("[{code}]").bright_black());
        }
        if let Some(id) = &info.id {
            let _ = write!(out, " {}", format!("(error id {id})").bright_black());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskforge_client::render;
    use taskforge_client::ErrorInfo;
    use taskforge_core::{
        ConstraintAnalysis, ConstraintWeights, MatchAnalysis, Resource, Schedule, Score, Task,
    };

    fn plain(s: &str) -> String {
        let mut out = String::new();
        let mut in_escape = false;
        for c in s.chars() {
            match (in_escape, c) {
                (false, '\u{1b}') => in_escape = true,
                (true, 'm') => in_escape = false,
                (false, c) => out.push(c),
                _ => {}
            }
        }
        out
    }

    #[test]
    fn test_schedule_rendering() {
        let schedule = Schedule::new(
            vec![Resource::new("A", 60, ["x"])],
            vec![
                Task::new("t1", "One", 40, "x").assigned_to("A"),
                Task::new("t2", "Two", 30, "y").assigned_to("A"),
                Task::new("t3", "Three", 5, ""),
            ],
        );
        let text = plain(&super::schedule(&render(
            Some(&schedule),
            &ConstraintWeights::default(),
        )));

        assert!(text.contains("Score ? │ UNSOLVED │ 2/3 tasks assigned │ 2 local violations"));
        assert!(text.contains("A  117% 70/60 │ x"));
        assert!(text.contains("y missing"));
        assert!(text.contains("Unassigned (1)"));
        assert!(text.contains("balance_load 50"));
    }

    #[test]
    fn test_empty_schedule() {
        let view = render(None, &ConstraintWeights::default());
        assert_eq!(plain(&schedule(&view)), "No dataset loaded");
    }

    #[test]
    fn test_analysis_rendering() {
        let analysis = ScoreAnalysis {
            constraints: vec![ConstraintAnalysis {
                name: "Required skill missing".to_string(),
                weight: Some(Score::of(100, 0)),
                score: Score::of(-3, 0),
                matches: vec![
                    MatchAnalysis {
                        score: Some("None".to_string()),
                        justification: "task-4".to_string(),
                        ..MatchAnalysis::default()
                    },
                    MatchAnalysis {
                        justification: "task-7".to_string(),
                        ..MatchAnalysis::default()
                    },
                ],
            }],
        };
        let text = plain(&super::analysis(&analysis));
        assert!(text.starts_with("✗ HARD Required skill missing"));
        assert!(text.contains("-3hard/0soft"));
        assert!(text.contains("weight 100hard/0soft"));
        assert!(text.contains("    None task-4"));
        assert!(text.contains("    ? task-7"));
    }

    #[test]
    fn test_notification_rendering() {
        let n = Notification::warning("Stop solving failed", "connection reset").with_info(Some(
            ErrorInfo {
                message: "boom".to_string(),
                id: Some("e-1".to_string()),
                ..ErrorInfo::default()
            },
        ));
        assert_eq!(
            plain(&notification(&n)),
            "Stop solving failed connection reset (error id e-1)"
        );
    }
}
