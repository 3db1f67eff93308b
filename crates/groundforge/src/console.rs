//! Colorful console output for exploration runs.
//!
//! Provides a `tracing` layer that formats generator and exploration events.
//!
//! ## Log Levels
//!
//! - **INFO**: Generator construction, exploration and batch start/end
//! - **DEBUG**: Per-state expansion
//! - **TRACE**: Per-schema grounding and state creation

use std::io::{self, Write};
use std::sync::OnceLock;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Installs the console layer as the global subscriber.
///
/// Safe to call multiple times - only the first call has effect. `RUST_LOG`
/// overrides the default `groundforge_state=info,groundforge_grounding=info`.
pub fn init() {
    INIT.get_or_init(|| {
        let mut filter = EnvFilter::from_default_env();
        for directive in ["groundforge_state=info", "groundforge_grounding=info"] {
            if let Ok(directive) = directive.parse::<Directive>() {
                filter = filter.add_directive(directive);
            }
        }

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(ExplorationConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats GroundForge events with colors.
pub struct ExplorationConsoleLayer;

impl<S: Subscriber> Layer<S> for ExplorationConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("groundforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    problem: Option<String>,
    kind: Option<String>,
    generator: Option<String>,
    status: Option<String>,
    states: Option<u64>,
    expanded: Option<u64>,
    transitions: Option<u64>,
    goal_states: Option<u64>,
    ground_actions: Option<u64>,
    ground_axioms: Option<u64>,
    fluent_atoms: Option<u64>,
    derived_atoms: Option<u64>,
    rounds: Option<u64>,
    problems: Option<u64>,
    threads: Option<u64>,
    failed: Option<u64>,
    duration_ms: Option<u64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        self.record_text(field, s);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        let slot = match field.name() {
            "states" => &mut self.states,
            "expanded" => &mut self.expanded,
            "transitions" => &mut self.transitions,
            "goal_states" => &mut self.goal_states,
            "ground_actions" => &mut self.ground_actions,
            "ground_axioms" | "axioms" => &mut self.ground_axioms,
            "fluent_atoms" => &mut self.fluent_atoms,
            "derived_atoms" => &mut self.derived_atoms,
            "rounds" => &mut self.rounds,
            "problems" => &mut self.problems,
            "threads" => &mut self.threads,
            "failed" => &mut self.failed,
            "duration_ms" => &mut self.duration_ms,
            _ => return,
        };
        *slot = Some(value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }
}

impl EventVisitor {
    fn record_text(&mut self, field: &Field, value: String) {
        let slot = match field.name() {
            "event" => &mut self.event,
            "problem" => &mut self.problem,
            "kind" => &mut self.kind,
            "generator" => &mut self.generator,
            "status" => &mut self.status,
            _ => return,
        };
        *slot = Some(value);
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "generator_ready" => format_generator_ready(v),
        "relaxed_exploration_done" => format_relaxed(v),
        "exploration_start" => format_exploration_start(v),
        "exploration_end" => format_exploration_end(v),
        "batch_start" => format_batch_start(v),
        "batch_end" => format_batch_end(v),
        _ => String::new(),
    }
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn header(tag: &str) -> String {
    format!(
        "{} {} {}",
        timestamp().bright_black(),
        "INFO".bright_green(),
        format!("[{}]", tag).bright_cyan()
    )
}

fn format_generator_ready(v: &EventVisitor) -> String {
    let line = format!(
        "{} {} generator ready for {}",
        header("Grounding"),
        v.kind.as_deref().unwrap_or("unknown").white().bold(),
        v.problem.as_deref().unwrap_or("?").bright_white()
    );
    // Only the grounded generator knows its actions up front.
    match v.ground_actions {
        Some(_) => format!(
            "{}: ground actions ({}), ground axioms ({})",
            line,
            count(v.ground_actions).bright_yellow(),
            count(v.ground_axioms).bright_yellow()
        ),
        None => line,
    }
}

fn format_relaxed(v: &EventVisitor) -> String {
    format!(
        "{} Delete relaxation saturated after {} rounds: fluent atoms ({}), derived atoms ({}), ground axioms ({})",
        header("Grounding"),
        count(v.rounds).yellow(),
        count(v.fluent_atoms).bright_yellow(),
        count(v.derived_atoms).bright_yellow(),
        count(v.ground_axioms).bright_yellow()
    )
}

fn format_exploration_start(v: &EventVisitor) -> String {
    format!(
        "{} Exploring {} with the {} generator",
        header("Explorer"),
        v.problem.as_deref().unwrap_or("?").bright_white().bold(),
        v.generator.as_deref().unwrap_or("?").to_lowercase().bright_magenta()
    )
}

fn format_exploration_end(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("?");
    let status = if status == "Complete" {
        status.bright_green().bold().to_string()
    } else {
        status.bright_red().bold().to_string()
    };
    format!(
        "{} Exploration ended ({}): time spent ({}), states ({}), expanded ({}), transitions ({}), goal states ({})",
        header("Explorer"),
        status,
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        count(v.states).bright_yellow(),
        count(v.expanded).white(),
        count(v.transitions).white(),
        count(v.goal_states).bright_magenta()
    )
}

fn format_batch_start(v: &EventVisitor) -> String {
    format!(
        "{} Exploring {} problems on {} threads",
        header("Batch"),
        count(v.problems).bright_yellow(),
        count(v.threads).bright_yellow()
    )
}

fn format_batch_end(v: &EventVisitor) -> String {
    let failed = v.failed.unwrap_or(0);
    let failed = if failed == 0 {
        count(v.failed).bright_green().to_string()
    } else {
        count(v.failed).bright_red().to_string()
    };
    format!(
        "{} Batch finished: problems ({}), failed ({})",
        header("Batch"),
        count(v.problems).bright_yellow(),
        failed
    )
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| format!("{:5}.{:03}", d.as_secs() % 100000, d.subsec_millis()))
        .unwrap_or_else(|_| "    0.000".to_string())
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        format!("{}m {}s", ms / 60_000, (ms % 60_000) / 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_unknown_events_are_skipped() {
        let visitor = EventVisitor {
            event: Some("state_created".to_string()),
            ..Default::default()
        };
        assert!(format_event(&visitor).is_empty());
    }

    #[test]
    fn test_exploration_end_mentions_counts() {
        let visitor = EventVisitor {
            event: Some("exploration_end".to_string()),
            status: Some("Complete".to_string()),
            states: Some(12_345),
            duration_ms: Some(42),
            ..Default::default()
        };
        let line = format_event(&visitor);
        assert!(line.contains("12,345"));
        assert!(line.contains("42ms"));
    }
}
