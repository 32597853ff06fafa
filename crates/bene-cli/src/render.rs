//! Report sinks for terminal tables and JSON.

use std::io::Write;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use bene_core::{ReportSink, SinkError};
use bene_model::{ChartMeta, CountMatrix, FrequencyTable, ReportItem, ReportPayload};

/// Renders each item as a titled terminal table.
pub struct TableSink<W: Write> {
    out: W,
    styled: bool,
}

impl<W: Write> TableSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, styled: false }
    }

    /// Force ANSI styling on or off regardless of the terminal.
    #[must_use]
    pub fn with_styling(mut self, styled: bool) -> Self {
        self.styled = styled;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn new_table(&self) -> Table {
        let mut table = Table::new();
        apply_report_table_style(&mut table);
        if self.styled {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }
        table
    }
}

impl<W: Write> ReportSink for TableSink<W> {
    fn emit(&mut self, item: &ReportItem) -> Result<(), SinkError> {
        let table = match &item.payload {
            ReportPayload::Frequency(counts) => frequency_table(self.new_table(), counts),
            ReportPayload::Matrix { matrix, chart } => {
                matrix_table(self.new_table(), matrix, chart)
            }
        };
        writeln!(self.out, "{}", item.title)?;
        writeln!(self.out, "{table}")?;
        writeln!(self.out)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.out.flush()?;
        Ok(())
    }
}

fn frequency_table(mut table: Table, counts: &FrequencyTable) -> Table {
    table.set_header(vec![header_cell(&counts.column), header_cell("Count")]);
    for entry in &counts.entries {
        table.add_row(vec![Cell::new(&entry.value), Cell::new(entry.count)]);
    }
    table.add_row(vec![total_label_cell(), Cell::new(counts.total()).add_attribute(Attribute::Bold)]);
    align_column(&mut table, 1, CellAlignment::Right);
    table
}

fn matrix_table(mut table: Table, matrix: &CountMatrix, chart: &ChartMeta) -> Table {
    let mut header = vec![header_cell(&format!("{} / {}", chart.x_label, chart.legend_title))];
    header.extend(matrix.col_labels.iter().map(|label| header_cell(label)));
    header.push(header_cell("Total"));
    table.set_header(header);

    if matrix.is_empty() {
        let mut row = vec![dim_cell("(no rows)")];
        row.push(dim_cell("-"));
        table.add_row(row);
        return table;
    }

    for (idx, label) in matrix.row_labels.iter().enumerate() {
        let mut row = vec![Cell::new(label)];
        row.extend(matrix.counts[idx].iter().map(|&count| count_cell(count)));
        row.push(Cell::new(matrix.row_total(idx)).add_attribute(Attribute::Bold));
        table.add_row(row);
    }

    let mut totals = vec![total_label_cell()];
    totals.extend(
        matrix
            .column_totals()
            .into_iter()
            .map(|total| Cell::new(total).add_attribute(Attribute::Bold)),
    );
    totals.push(Cell::new(matrix.grand_total()).add_attribute(Attribute::Bold));
    table.add_row(totals);

    for idx in 1..=matrix.column_count() + 1 {
        align_column(&mut table, idx, CellAlignment::Right);
    }
    table
}

fn apply_report_table_style(table: &mut Table) {
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

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn total_label_cell() -> Cell {
    Cell::new("TOTAL")
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: u64) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

/// Writes all items as one pretty-printed JSON array on finish.
pub struct JsonSink<W: Write> {
    out: W,
    items: Vec<ReportItem>,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            items: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn emit(&mut self, item: &ReportItem) -> Result<(), SinkError> {
        self.items.push(item.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        serde_json::to_writer_pretty(&mut self.out, &self.items).map_err(std::io::Error::from)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
