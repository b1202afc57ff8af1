//! Plan and result reports
//!
//! Printing goes through `ui`/`colored`. Only the formatting helpers are
//! tested; layout is free to change.

use colored::Colorize;
use declarative::{
    AttributeChange, Operation, Outcome, ProgressCallback, ReconciliationPlan,
    ReconciliationResult, ResultCounts, changed_attributes,
};
use serde_json::Value;

use crate::ui;

const VALUE_WIDTH: usize = 48;

/// Print what a plan would do
pub fn print_plan(noun: &str, plan: &ReconciliationPlan) {
    ui::section(&format!("Plan: {noun}"));

    for entity in &plan.to_create {
        println!("  {} {}", "+".green().bold(), entity.key);
    }
    for (desired, actual) in &plan.to_update {
        println!("  {} {}", "~".yellow().bold(), desired.key);
        for change in changed_attributes(desired, actual) {
            ui::dim(&format_change(&change));
        }
    }
    for entity in &plan.to_delete {
        println!("  {} {}", "-".red().bold(), entity.key);
    }

    if plan.is_empty() {
        ui::success(&format!(
            "All {} already in sync",
            ui::plural(plan.in_sync.len(), noun)
        ));
    } else {
        ui::dim(&format!(
            "{} to create, {} to update, {} to delete, {} in sync",
            plan.to_create.len(),
            plan.to_update.len(),
            plan.to_delete.len(),
            plan.in_sync.len()
        ));
    }
}

/// Print counts and every failure of a finished run
pub fn print_result(noun: &str, result: &ReconciliationResult) {
    let counts = result.counts();
    ui::section(&format!("Result: {noun}"));
    println!("  {}", format_counts(&counts));

    for (key, reason) in result.failures() {
        println!("  {} {}: {}", "✗".red(), key.bold(), reason);
    }
    for entry in result.outcomes().iter().filter(|e| e.recovered) {
        ui::dim(&format!(
            "{} was missing remotely and has been recreated",
            entry.key
        ));
    }

    if counts.failed == 0 {
        ui::success(&format!("{} reconciled", capitalize(noun)));
    } else {
        ui::warn(&format!(
            "{} of {} failed",
            counts.failed,
            ui::plural(counts.total(), noun)
        ));
    }
}

/// `2 created, 1 updated, 26 skipped, 1 deleted, 0 failed`
pub fn format_counts(counts: &ResultCounts) -> String {
    format!(
        "{} created, {} updated, {} skipped, {} deleted, {} failed",
        counts.created, counts.updated, counts.skipped, counts.deleted, counts.failed
    )
}

/// `color: ffffff → d73a4a`
pub fn format_change(change: &AttributeChange) -> String {
    let current = change
        .current
        .as_ref()
        .map_or_else(|| "(unset)".to_string(), format_value);
    format!(
        "{}: {} → {}",
        change.name,
        ui::truncate(&current, VALUE_WIDTH),
        ui::truncate(&format_value(&change.desired), VALUE_WIDTH)
    )
}

/// Compact one-line rendering of an attribute value
///
/// Strings print bare, arrays of named objects print their names.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) if s.is_empty() => "\"\"".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let names: Vec<String> = items
                .iter()
                .map(|item| match item.get("name").and_then(Value::as_str) {
                    Some(name) => name.to_string(),
                    None => format_value(item),
                })
                .collect();
            format!("[{}]", names.join(", "))
        }
        other => other.to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Progress callback that prints one line per finished entity
pub struct ConsoleProgress {
    quiet: bool,
}

impl ConsoleProgress {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl ProgressCallback for ConsoleProgress {
    fn on_phase_start(&mut self, op: Operation, count: usize) {
        if !self.quiet {
            let verb = match op {
                Operation::Create => "Creating",
                Operation::Update => "Updating",
                Operation::Delete => "Deleting",
            };
            println!("  {} {}...", verb.cyan(), count);
        }
    }

    fn on_entity_start(&mut self, op: Operation, key: &str) {
        log::debug!("{op} {key}");
    }

    fn on_entity_complete(&mut self, key: &str, outcome: &Outcome) {
        match outcome {
            Outcome::Failed { reason } => {
                println!("    {} {} {}", "✗".red(), key, reason.to_string().red());
            }
            _ if self.quiet => {}
            Outcome::Created => println!("    {} {}", "+".green(), key),
            Outcome::Updated => println!("    {} {}", "~".yellow(), key),
            Outcome::Deleted => println!("    {} {}", "-".red(), key),
            Outcome::Skipped => {}
        }
    }
}
