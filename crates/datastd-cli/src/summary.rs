use anyhow::Result;
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde_json::{Value, json};

use datastd_core::EntryCheck;
use datastd_model::StandardizeReport;

use crate::cli::SummaryFormatArg;

pub fn print_report(
    report: &StandardizeReport,
    format: SummaryFormatArg,
    dry_run: bool,
) -> Result<()> {
    match format {
        SummaryFormatArg::Json => println!("{}", serde_json::to_string_pretty(report)?),
        SummaryFormatArg::Table => {
            if dry_run {
                println!("Dry run: no tables were written.");
            }
            println!("{}", report_table(report));
        }
    }
    Ok(())
}

pub fn print_checks(checks: &[EntryCheck], format: SummaryFormatArg) -> Result<()> {
    match format {
        SummaryFormatArg::Json => {
            println!("{}", serde_json::to_string_pretty(&checks_json(checks))?);
        }
        SummaryFormatArg::Table => println!("{}", check_table(checks)),
    }
    Ok(())
}

/// One row per entry plus a total row.
pub fn report_table(report: &StandardizeReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Schema"),
        header_cell("Table"),
        header_cell("Rows"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for result in &report.results {
        table.add_row(vec![
            Cell::new(&result.source_table)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&result.target_schema),
            Cell::new(&result.target_table),
            count_cell(result.rows_written),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(format!("{} target(s)", report.target_count())).add_attribute(Attribute::Bold),
        Cell::new(report.total_rows()).add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn check_table(checks: &[EntryCheck]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Entry"),
        header_cell("Source"),
        header_cell("Target"),
        header_cell("Mode"),
        header_cell("Join key"),
        header_cell("Rules"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 5, CellAlignment::Right);
    for check in checks {
        let source = match &check.source_schema {
            Some(schema) => format!("{schema}.{}", check.source_table),
            None => check.source_table.clone(),
        };
        let (mode, key) = match &check.join_keys {
            Some(keys) => (
                Cell::new("relational").fg(Color::Magenta),
                Cell::new(format!("{} -> {}", keys.source_key, keys.target_key)),
            ),
            None => (Cell::new("independent"), dim_cell("-")),
        };
        table.add_row(vec![
            Cell::new(&check.entry),
            Cell::new(source),
            Cell::new(check.target.key())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            mode,
            key,
            Cell::new(check.rule_count),
        ]);
    }
    table
}

fn checks_json(checks: &[EntryCheck]) -> Value {
    let entries: Vec<Value> = checks
        .iter()
        .map(|check| {
            json!({
                "entry": check.entry,
                "source_table": check.source_table,
                "source_schema": check.source_schema,
                "target_schema": check.target.schema,
                "target_table": check.target.table,
                "relational": check.join_keys.is_some(),
                "source_key": check.join_keys.as_ref().map(|keys| keys.source_key.as_str()),
                "target_key": check.join_keys.as_ref().map(|keys| keys.target_key.as_str()),
                "rules": check.rule_count,
            })
        })
        .collect();
    json!({ "entries": entries })
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
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
