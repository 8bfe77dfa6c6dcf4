use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ruleout_cli::logging::redact_value;
use ruleout_cli::types::{CatalogResult, ExportResult, FieldRow};
use ruleout_model::{CaseFailure, DiagnosticKind};

pub fn print_export_summary(result: &ExportResult) {
    println!("Cohort: {}", result.cohort);
    println!("Output: {}", result.output.display());
    if let Some(catalog) = &result.catalog {
        println!("Catalog: {}", catalog.output.display());
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Cases")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Found"), Cell::new(result.cases_found)]);
    table.add_row(vec![Cell::new("Exported"), Cell::new(result.exported)]);
    table.add_row(vec![
        Cell::new("Dropped"),
        count_cell(result.dropped.len(), Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Removed by post-filter"),
        count_cell(result.filtered, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Random identifiers"),
        count_cell(result.random_ids, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Rows written")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.rows_written).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    print_diagnostic_table(result);
    print_dropped_table(&result.dropped);
}

pub fn print_catalog_summary(result: &CatalogResult) {
    println!("Catalog: {}", result.output.display());
    println!(
        "{} field(s) across {} case(s)",
        result.fields, result.cases_found
    );
    print_dropped_table(&result.dropped);
}

pub fn print_fields(rows: &[FieldRow]) {
    if rows.is_empty() {
        println!("No cases found.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Value"),
    ]);
    apply_table_style(&mut table);
    for row in rows {
        let value = if row.value.is_empty() {
            dim_cell("(empty)")
        } else {
            Cell::new(&row.value)
        };
        table.add_row(vec![
            Cell::new(&row.field_key).fg(Color::Blue),
            Cell::new(&row.label),
            value,
        ]);
    }
    println!("{table}");
}

fn print_diagnostic_table(result: &ExportResult) {
    if result.diagnostics.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Diagnostic"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for kind in DiagnosticKind::ALL {
        let Some(count) = result.diagnostics.get(&kind) else {
            continue;
        };
        table.add_row(vec![
            Cell::new(kind.as_str()),
            count_cell(*count, kind_color(kind)),
        ]);
    }
    println!();
    println!("Diagnostics:");
    println!("{table}");
}

fn print_dropped_table(dropped: &[CaseFailure]) {
    if dropped.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Case"),
        header_cell("Reason"),
        header_cell("Attributes"),
    ]);
    apply_table_style(&mut table);
    for failure in dropped {
        let attributes = failure
            .attributes
            .iter()
            .map(|(key, value)| format!("{key}={}", redact_value(value)))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(failure.case_ref()).fg(Color::Red),
            Cell::new(&failure.reason),
            Cell::new(attributes),
        ]);
    }
    eprintln!();
    eprintln!("Dropped cases:");
    eprintln!("{table}");
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
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn kind_color(kind: DiagnosticKind) -> Color {
    match kind {
        DiagnosticKind::CaseDropped => Color::Red,
        _ => Color::Yellow,
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
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
