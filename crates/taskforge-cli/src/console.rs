//! Colorful console output for session logs.
//!
//! Provides a custom `tracing` layer that formats client events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Session lifecycle (dataset loaded, solving started/finished)
//! - **DEBUG**: Individual fetches with sequence numbers
//! - **TRACE**: Synchronization ticks and raw HTTP status lines

use owo_colors::OwoColorize;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "taskforge_client=info";

/// Initializes console logging.
///
/// Safe to call multiple times - only the first call has effect.
/// `verbosity` raises the default level: 1 for debug, 2 or more for trace.
pub fn init(verbosity: u8, banner: bool) {
    INIT.get_or_init(|| {
        EPOCH.get_or_init(Instant::now);
        if banner {
            print_banner();
        }

        let default = match verbosity {
            0 => DEFAULT_FILTER,
            1 => "taskforge_client=debug",
            _ => "taskforge_client=trace,taskforge_core=trace",
        };
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default));
        // The binary's own messages.
        if let Ok(directive) = "taskforge=info".parse() {
            filter = filter.add_directive(directive);
        }

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SessionConsoleLayer)
            .try_init();
    });
}

fn elapsed_secs() -> f64 {
    EPOCH.get().map_or(0.0, |epoch| epoch.elapsed().as_secs_f64())
}

fn print_banner() {
    let banner = r#"
 _____         _    _____
|_   _|_ _ ___| | _|  ___|__  _ __ __ _  ___
  | |/ _` / __| |/ / |_ / _ \| '__/ _` |/ _ \
  | | (_| \__ \   <|  _| (_) | | | (_| |  __/
  |_|\__,_|___/_|\_\_|  \___/|_|  \__, |\___|
                                  |___/
"#;

    let version_line = format!("            v{} - Solver Service Client\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats session events with colors.
pub struct SessionConsoleLayer;

impl<S: Subscriber> Layer<S> for SessionConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("taskforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level(), elapsed_secs());
        // Warnings and errors go to stderr so piped output stays clean.
        if *metadata.level() <= Level::WARN {
            let _ = writeln!(io::stderr(), "{}", output);
        } else {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl EventVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name(), value));
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.push(field, s.trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }
}

fn format_event(v: &EventVisitor, level: Level, elapsed: f64) -> String {
    let icon = match level {
        Level::ERROR => "✗".bright_red().bold().to_string(),
        Level::WARN => "!".bright_yellow().bold().to_string(),
        Level::INFO => "▸".bright_green().to_string(),
        Level::DEBUG => "·".bright_blue().to_string(),
        Level::TRACE => "·".bright_black().to_string(),
    };

    let message = match level {
        Level::ERROR => v.message.bright_red().to_string(),
        Level::WARN => v.message.yellow().to_string(),
        Level::INFO => v.message.white().bold().to_string(),
        _ => v.message.white().to_string(),
    };

    let mut output = format!(
        "{} {} {}",
        format!("{:>7.3}s", elapsed).bright_black(),
        icon,
        message
    );

    for (name, value) in &v.fields {
        let value = match *name {
            "score" => format_score(value),
            "job_id" | "dataset" => value.bright_cyan().to_string(),
            "error" => value.bright_red().to_string(),
            _ => value.bright_yellow().to_string(),
        };
        let _ = write!(output, " │ {} {}", name.bright_black(), value);
    }

    output
}

/// Colors a score string: negative hard red, feasible green, negative soft
/// yellow. Unparseable input is returned uncolored.
pub fn format_score(score: &str) -> String {
    let parts: Vec<&str> = score.split('/').collect();
    if parts.len() < 2 || !score.contains("hard") {
        return score.white().to_string();
    }

    parts
        .iter()
        .map(|part| {
            let digits = part.trim_end_matches(|c: char| c.is_ascii_alphabetic());
            let value: f64 = digits.parse().unwrap_or(0.0);
            let is_hard = part.ends_with("hard");
            if value < 0.0 && is_hard {
                part.bright_red().to_string()
            } else if value < 0.0 {
                part.yellow().to_string()
            } else if is_hard {
                part.bright_green().to_string()
            } else {
                part.white().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Formats a millisecond duration for humans.
pub fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_ansi(s: &str) -> String {
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
    fn test_format_score_keeps_text() {
        assert_eq!(strip_ansi(&format_score("-2hard/-15soft")), "-2hard/-15soft");
        assert_eq!(
            strip_ansi(&format_score("0hard/-1medium/-3soft")),
            "0hard/-1medium/-3soft"
        );
        assert_eq!(strip_ansi(&format_score("?")), "?");
    }

    #[test]
    fn test_format_event_fields() {
        let visitor = EventVisitor {
            message: "Solving started".to_string(),
            fields: vec![("job_id", "job-1".to_string()), ("tasks", "10".to_string())],
        };
        let line = strip_ansi(&format_event(&visitor, Level::INFO, 1.5));
        assert_eq!(line, "  1.500s ▸ Solving started │ job_id job-1 │ tasks 10");
    }

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(2_000), "2.00s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }
}
