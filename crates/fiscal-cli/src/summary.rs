use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use fiscal_common::{any_to_string, column_value};
use fiscal_model::ResolvedVariable;
use polars::prelude::DataFrame;

use crate::types::{CleanResult, EnrichResult, LookupResult};

/// Rows shown when a command prints a table instead of writing a file.
const PREVIEW_ROWS: usize = 20;

pub fn print_enrich_summary(result: &EnrichResult) {
    println!("Input: {}", result.input.display());
    println!("Identifier column: {}", result.id_field);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Input rows"),
        header_cell("Enriched rows"),
        header_cell("Dropped rows"),
        header_cell("Unmatched ids"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let dropped = result.input_rows.saturating_sub(result.frame.height());
    table.add_row(vec![
        Cell::new(result.input_rows),
        Cell::new(result.frame.height()).add_attribute(Attribute::Bold),
        count_cell(dropped, Color::Yellow),
        count_cell(result.unmatched_ids, Color::Yellow),
    ]);
    println!("{table}");
    match &result.output {
        Some(path) => println!("Output: {}", path.display()),
        None => print_frame_preview(&result.frame),
    }
}

pub fn print_lookup(result: &LookupResult) {
    let Some(resolved) = &result.resolved else {
        eprintln!(
            "No variable found for {} on form {} in tax year {}",
            result.var_code, result.format_id, result.year
        );
        return;
    };
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    table.add_row(vec![label_cell("Form"), Cell::new(result.format_id)]);
    table.add_row(vec![label_cell("Code"), Cell::new(&result.var_code)]);
    table.add_row(vec![label_cell("Tax year"), Cell::new(result.year)]);
    table.add_row(vec![label_cell("name_var"), optional_cell(&resolved.name_var)]);
    table.add_row(vec![
        label_cell("composed_name"),
        optional_cell(&resolved.composed_name),
    ]);
    table.add_row(vec![label_cell("prefix"), prefix_cell(resolved)]);
    table.add_row(vec![
        label_cell("var_number"),
        Cell::new(resolved.meta.var_number),
    ]);
    println!("{table}");
}

pub fn print_clean_summary(result: &CleanResult) {
    println!("Input: {}", result.input.display());
    if result.retyped.is_empty() {
        println!("Retyped columns: none");
    } else {
        println!("Retyped columns: {}", result.retyped.join(", "));
    }
    match &result.output {
        Some(path) => println!("Output: {}", path.display()),
        None => print_frame_preview(&result.frame),
    }
}

/// Render the first rows of a frame.
pub fn print_frame_preview(df: &DataFrame) {
    let mut table = Table::new();
    table.set_header(
        df.get_column_names()
            .iter()
            .map(|name| header_cell(name.as_str()))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    let shown = df.height().min(PREVIEW_ROWS);
    for idx in 0..shown {
        let row: Vec<Cell> = df
            .get_column_names()
            .iter()
            .map(|name| value_cell(any_to_string(column_value(df, name.as_str(), idx))))
            .collect();
        table.add_row(row);
    }
    println!("{table}");
    if df.height() > shown {
        println!("... {} more rows", df.height() - shown);
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn optional_cell(value: &Option<String>) -> Cell {
    match value {
        Some(text) => Cell::new(text),
        None => dim_cell("-"),
    }
}

fn prefix_cell(resolved: &ResolvedVariable) -> Cell {
    if resolved.meta.prefix.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(&resolved.meta.prefix)
    }
}

fn value_cell(value: String) -> Cell {
    if value.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(value)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn label_cell(label: &str) -> Cell {
    Cell::new(label).fg(Color::Blue)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
