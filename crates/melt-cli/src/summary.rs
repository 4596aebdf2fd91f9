use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use melt_cli::batch::{BatchReport, FileOutcome};
use melt_model::LongTable;

pub fn print_report(report: &BatchReport, output_dir: &std::path::Path) {
    println!("Output: {}", output_dir.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Input"),
        header_cell("Output"),
        header_cell("Departments"),
        header_cell("Months"),
        header_cell("Rows"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);

    for outcome in &report.outcomes {
        table.add_row(outcome_row(outcome));
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!("{} of {} written", report.succeeded(), report.outcomes.len()))
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(report.total_records()).add_attribute(Attribute::Bold),
        count_cell(report.failed(), Color::Red).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    if report.has_failures() {
        eprintln!("Errors:");
        for outcome in &report.outcomes {
            if let Some(failure) = outcome.failure() {
                eprintln!(
                    "- [{}] {}: {}",
                    failure.kind,
                    file_name(&outcome.input),
                    failure.message
                );
            }
        }
    }
}

fn outcome_row(outcome: &FileOutcome) -> Vec<Cell> {
    let input = Cell::new(file_name(&outcome.input));
    match &outcome.result {
        Ok(summary) => {
            let status = if summary.written {
                Cell::new("✓")
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold)
            } else {
                dim_cell("dry run")
            };
            vec![
                input,
                Cell::new(file_name(&outcome.output)),
                Cell::new(summary.categories),
                Cell::new(summary.periods),
                Cell::new(summary.records),
                status,
            ]
        }
        Err(failure) => vec![
            input,
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            dim_cell("-"),
            Cell::new(failure.kind.as_str()).fg(Color::Red),
        ],
    }
}

pub fn print_preview(table: &LongTable, rows: usize) {
    let mut out = Table::new();
    out.set_header(
        table
            .labels()
            .headers()
            .iter()
            .map(|label| header_cell(label))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut out);
    align_column(&mut out, 0, CellAlignment::Right);
    align_column(&mut out, 5, CellAlignment::Right);
    for record in table.records().iter().take(rows) {
        out.add_row(vec![
            Cell::new(record.sequence_number),
            Cell::new(&record.category),
            Cell::new(&record.period_label),
            Cell::new(&record.year),
            Cell::new(&record.month_label),
            Cell::new(record.value.to_string()),
        ]);
    }
    println!("{out}");
    if table.len() > rows {
        println!("... {} more rows", table.len() - rows);
    }
    println!(
        "{} rows, {} departments",
        table.len(),
        table.categories().len()
    );
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
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
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
