//! Colorful console output for selection runs.
//!
//! Provides a custom `tracing` layer that formats solver events with colors,
//! a plain-text [`report`] of a solution, and the [`plots`] output directory.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (solve start/end)
//! - **DEBUG**: Model and constraint statistics
//! - **WARN**: Unproven optimality, uncovered categories, ignored settings

pub mod plots;
pub mod report;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub use plots::{CoverageChart, Figure, PlotDirectory, PlotError, DEFAULT_EXTENSION};
pub use report::render_report;

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Package version for banner display.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "welfaresel_solver=info,welfaresel_cli=info";

/// Initializes the console output.
///
/// Safe to call multiple times - only the first call has effect.
/// Prints the banner and sets up tracing.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SelectionConsoleLayer)
            .try_init();
    });
}

// Marks the start of solving for elapsed time tracking.
fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SOLVE_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
__        __   _  __               ____       _
\ \      / /__| |/ _| __ _ _ __ __/ ___|  ___| |
 \ \ /\ / / _ \ | |_ / _` | '__/ _ \___ \ / _ \ |
  \ V  V /  __/ |  _| (_| | | |  __/___) |  __/ |
   \_/\_/ \___|_|_|  \__,_|_|  \___|____/ \___|_|
"#;

    let version_line = format!("              v{} - Welfare Indicator Selection\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats selection events with colors.
pub struct SelectionConsoleLayer;

impl<S: Subscriber> Layer<S> for SelectionConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();

        if !target.starts_with("welfaresel_solver")
            && !target.starts_with("welfaresel_cli")
            && !target.starts_with("welfaresel::")
        {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    status: Option<String>,
    objective: Option<f64>,
    feasible: Option<bool>,
    indicator_count: Option<u64>,
    hazard_count: Option<u64>,
    consequence_count: Option<u64>,
    target_count: Option<u64>,
    variable_count: Option<u64>,
    constraint_count: Option<u64>,
    selection_vars: Option<u64>,
    coverage_vars: Option<u64>,
    excluded: Option<u64>,
    linked: Option<u64>,
    pinned: Option<u64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        match field.name() {
            "event" => self.event = Some(s.trim_matches('"').to_string()),
            "message" => self.message = Some(s.trim_matches('"').to_string()),
            "status" => self.status = Some(s.trim_matches('"').to_string()),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "indicator_count" => self.indicator_count = Some(value),
            "hazard_count" => self.hazard_count = Some(value),
            "consequence_count" => self.consequence_count = Some(value),
            "target_count" => self.target_count = Some(value),
            "variable_count" => self.variable_count = Some(value),
            "constraint_count" => self.constraint_count = Some(value),
            "selection_vars" => self.selection_vars = Some(value),
            "coverage_vars" => self.coverage_vars = Some(value),
            "excluded" => self.excluded = Some(value),
            "linked" => self.linked = Some(value),
            "pinned" => self.pinned = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "objective" {
            self.objective = Some(value);
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "feasible" {
            self.feasible = Some(value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    let event = v.event.as_deref().unwrap_or("");

    match event {
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "model_built" => format_model_built(v, level),
        "constraints_added" => format_constraints_added(v, level),
        _ if level == Level::WARN => format_warning(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_count(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();
    let indicators = v.indicator_count.unwrap_or(0);
    let target = v.target_count.unwrap_or(0);
    let hazards = v.hazard_count.unwrap_or(0);
    let consequences = v.consequence_count.unwrap_or(0);
    let scale = calculate_problem_scale(indicators, target);

    let mut output = format!(
        "{} {} Solving │ choose {} of {} indicators │ {} hazards │ {} consequences │ scale {}",
        format_elapsed(),
        "▶".bright_green().bold(),
        format_count(target).bright_yellow(),
        format_count(indicators).bright_yellow(),
        format_count(hazards).bright_yellow(),
        format_count(consequences).bright_yellow(),
        scale.bright_magenta()
    );

    if let (Some(vars), Some(constraints)) = (v.variable_count, v.constraint_count) {
        output.push_str(&format!(
            " │ {} vars │ {} constraints",
            format_count(vars).bright_yellow(),
            format_count(constraints).bright_yellow()
        ));
    }

    output
}

fn format_solve_end(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("UNKNOWN");
    let feasible = v.feasible.unwrap_or(false);
    let optimal = status == "OPTIMAL";

    let status_colored = if optimal {
        status.bright_green().bold().to_string()
    } else if feasible {
        status.bright_yellow().bold().to_string()
    } else {
        status.bright_red().bold().to_string()
    };

    let mut output = format!(
        "{} {} Solving complete │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        status_colored
    );

    let Some(objective) = v.objective.filter(|_| feasible) else {
        return output;
    };
    output.push_str(&format!(" │ objective {}", format_objective(objective)));

    // Summary box
    output.push_str("\n\n");
    output.push_str(
        &"╔══════════════════════════════════════════════════════════╗"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    let status_text = if optimal {
        "OPTIMAL SELECTION FOUND"
    } else {
        "FEASIBLE SELECTION (optimality not proven)"
    };
    let inner_width: usize = 58;
    let total_pad = inner_width.saturating_sub(status_text.len());
    let left_pad = total_pad / 2;
    let right_pad = total_pad - left_pad;
    let status_line = if optimal {
        status_text.bright_green().bold().to_string()
    } else {
        status_text.bright_yellow().bold().to_string()
    };
    output.push_str(&format!(
        "{}{}{}{}{}",
        "║".bright_cyan(),
        " ".repeat(left_pad),
        status_line,
        " ".repeat(right_pad),
        "║".bright_cyan()
    ));
    output.push('\n');

    output.push_str(
        &"╠══════════════════════════════════════════════════════════╣"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    output.push_str(&format!(
        "{}  {:<18}{:>36.4}  {}",
        "║".bright_cyan(),
        "Objective:",
        objective,
        "║".bright_cyan()
    ));
    output.push('\n');

    output.push_str(
        &"╚══════════════════════════════════════════════════════════╝"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    output
}

fn format_model_built(v: &EventVisitor, level: Level) -> String {
    if level != Level::DEBUG {
        return String::new();
    }

    format!(
        "{} {} Model │ {} selection vars │ {} coverage vars │ {} excluded",
        format_elapsed(),
        "◆".bright_blue(),
        format_count(v.selection_vars.unwrap_or(0)).white(),
        format_count(v.coverage_vars.unwrap_or(0)).white(),
        format_count(v.excluded.unwrap_or(0)).white(),
    )
}

fn format_constraints_added(v: &EventVisitor, level: Level) -> String {
    if level != Level::DEBUG {
        return String::new();
    }

    format!(
        "{} {} Constraints │ {} total │ {} linked │ {} pinned",
        format_elapsed(),
        "◆".bright_blue(),
        format_count(v.constraint_count.unwrap_or(0)).white(),
        format_count(v.linked.unwrap_or(0)).white(),
        format_count(v.pinned.unwrap_or(0)).white(),
    )
}

fn format_warning(v: &EventVisitor) -> String {
    let message = v.message.as_deref().unwrap_or("");
    if message.is_empty() {
        return String::new();
    }
    format!("{} {} {}", format_elapsed(), "⚠".bright_yellow().bold(), message.yellow())
}

fn format_objective(objective: f64) -> String {
    let text = format!("{:.4}", objective);
    if objective < 0.0 {
        text.bright_red().to_string()
    } else if objective > 0.0 {
        text.bright_green().to_string()
    } else {
        text.white().to_string()
    }
}

// Size of the search space: the number of K-subsets of the indicators.
fn calculate_problem_scale(indicators: u64, target: u64) -> String {
    if indicators == 0 || target > indicators {
        return "0".to_string();
    }

    let k = target.min(indicators - target);
    let log_scale: f64 = (0..k)
        .map(|i| ((indicators - i) as f64).log10() - ((i + 1) as f64).log10())
        .sum();
    let exponent = log_scale.floor() as i32;
    let mantissa = 10f64.powf(log_scale - exponent as f64);

    format!("{:.3} x 10^{}", mantissa, exponent)
}
