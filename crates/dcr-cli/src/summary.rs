use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dcr_core::MentionCount;
use dcr_ingest::TrialLoad;
use dcr_model::{IgnoredEntry, LookupStatus};
use dcr_normalization::Expansion;

use dcr_cli::pipeline::{Inputs, RunOutcome};

/// Missing names listed in the terminal summary; the file has them all.
const MISSING_PREVIEW: usize = 30;

pub fn print_summary(inputs: &Inputs, outcome: &RunOutcome) {
    let reconciliation = &outcome.reconciliation;
    let stats = reconciliation.stats;
    let lookups = outcome.lookups;

    println!("Trial export: {}", inputs.trials_path.display());
    println!("Roster: {}", inputs.roster_path.display());
    for path in &outcome.written {
        println!("Wrote: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Count")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let rows: [(&str, usize, Option<Color>); 12] = [
        ("Trial records", stats.records, None),
        ("Skipped trial rows", inputs.trials.skipped.len(), Some(Color::Yellow)),
        ("Roster compounds", reconciliation.compounds.len(), None),
        ("Skipped roster rows", inputs.roster.skipped.len(), Some(Color::Yellow)),
        ("Drug mentions", stats.mentions, None),
        ("Rejected tokens", stats.rejected, Some(Color::Yellow)),
        ("Matched mentions", stats.matched, None),
        ("Ignored mentions", stats.ignored, None),
        ("Missing mentions", stats.missing, None),
        ("Compounds with trials", stats.compounds_with_trials, None),
        ("Synonym conflicts", reconciliation.conflicts.len(), Some(Color::Yellow)),
        ("Missing names", stats.missing_names, None),
    ];
    for (label, count, warn_color) in rows {
        table.add_row(vec![Cell::new(label), count_cell(count, warn_color)]);
    }
    table.add_row(vec![
        Cell::new("Lookups").add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{} found / {} not found / {} failed / {} skipped ({} cached)",
            lookups.found, lookups.not_found, lookups.failed, lookups.skipped, lookups.cached
        )),
    ]);
    println!("{table}");

    print_conflicts(outcome);
    print_missing(outcome);
}

fn print_conflicts(outcome: &RunOutcome) {
    let conflicts = &outcome.reconciliation.conflicts;
    if conflicts.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Alias"),
        header_cell("Kept"),
        header_cell("Rejected"),
        header_cell("Kind"),
    ]);
    apply_table_style(&mut table);
    for conflict in conflicts {
        table.add_row(vec![
            Cell::new(&conflict.alias),
            Cell::new(&conflict.kept).fg(Color::Green),
            Cell::new(&conflict.rejected).fg(Color::Yellow),
            dim_cell(format!("{:?}", conflict.kind)),
        ]);
    }
    println!();
    println!("Synonym conflicts:");
    println!("{table}");
}

fn print_missing(outcome: &RunOutcome) {
    let missing = &outcome.reconciliation.missing;
    if missing.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Drug"),
        header_cell("Lookup"),
        header_cell("Identifiers"),
        header_cell("Trials"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for entry in missing.iter().take(MISSING_PREVIEW) {
        table.add_row(vec![
            Cell::new(&entry.drug_name),
            status_cell(&entry.lookup),
            ids_cell(&entry.suggested_ids),
            Cell::new(entry.trials.len()),
        ]);
    }
    println!();
    if missing.len() > MISSING_PREVIEW {
        println!("Missing names (first {MISSING_PREVIEW} of {}):", missing.len());
    } else {
        println!("Missing names:");
    }
    println!("{table}");
}

pub fn print_lookup_results(results: &[(String, LookupStatus, Vec<String>)]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Lookup"),
        header_cell("Identifiers"),
    ]);
    apply_table_style(&mut table);
    for (name, status, ids) in results {
        table.add_row(vec![Cell::new(name), status_cell(status), ids_cell(ids)]);
    }
    println!("{table}");
}

pub fn print_stats(
    trials: &TrialLoad,
    expansion: &Expansion,
    counts: &[MentionCount],
    types: &[String],
    top: usize,
) {
    println!(
        "{} trials, {} skipped rows, {} drug mentions, {} rejected tokens, {} distinct names",
        trials.records.len(),
        trials.skipped.len(),
        expansion.mentions.len(),
        expansion.rejected.len(),
        counts.len()
    );

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Drug"),
        header_cell("Mentions"),
        header_cell("Trials"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for count in counts.iter().take(top) {
        table.add_row(vec![
            Cell::new(&count.name),
            Cell::new(count.mentions),
            Cell::new(count.trials),
        ]);
    }
    println!("{table}");

    if !types.is_empty() {
        println!();
        println!("Trial types: {}", types.join(", "));
    }
}

pub fn print_ignore_proposals(proposals: &[IgnoredEntry]) {
    if proposals.is_empty() {
        println!("No unresolved names to ignore.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Drug"), header_cell("Reason")]);
    apply_table_style(&mut table);
    for entry in proposals {
        table.add_row(vec![
            Cell::new(&entry.drug_name),
            entry
                .reason
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: &LookupStatus) -> Cell {
    match status {
        LookupStatus::Found => Cell::new(status.label()).fg(Color::Green),
        LookupStatus::NotFound => Cell::new(status.label()).fg(Color::Yellow),
        LookupStatus::Failed(_) => Cell::new(status.to_string())
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        LookupStatus::Skipped => dim_cell(status.label()),
    }
}

fn ids_cell(ids: &[String]) -> Cell {
    if ids.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(ids.join(", "))
    }
}

fn count_cell(count: usize, warn_color: Option<Color>) -> Cell {
    match warn_color {
        Some(color) if count > 0 => Cell::new(count).fg(color).add_attribute(Attribute::Bold),
        _ if count == 0 => dim_cell(count),
        _ => Cell::new(count),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
