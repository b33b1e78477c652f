//! Table extraction and normalization
//!
//! Tables are read into rectangular grids of trimmed strings. A cell that
//! spans several grid columns contributes its text once per spanned column,
//! so a merged region shows up as a run of repeated values and the logical
//! row always has as many cells as the table has physical columns. The
//! reassembler later re-derives merges from those repeated runs; extraction
//! itself never collapses them.

use super::super::models::DocumentElement;

/// Extract one table into a [`DocumentElement::Table`].
///
/// `spans` carries the per-cell grid-span values recovered from the raw
/// document XML for this table, when available. Returns `None` for tables
/// with no rows.
pub(crate) fn extract_table(
    table: &docx_rs::Table,
    spans: Option<&Vec<Vec<usize>>>,
) -> Option<DocumentElement> {
    let mut grid: Vec<Vec<String>> = Vec::new();

    for (row_index, table_child) in table.rows.iter().enumerate() {
        let docx_rs::TableChild::TableRow(row) = table_child;
        let row_spans = spans.and_then(|s| s.get(row_index));
        let mut cells = Vec::new();

        for (cell_index, row_child) in row.cells.iter().enumerate() {
            let docx_rs::TableRowChild::TableCell(cell) = row_child;
            let text = extract_cell_text(cell);

            let span = row_spans
                .and_then(|r| r.get(cell_index).copied())
                .unwrap_or(1)
                .max(1);

            // Spanned cells repeat their content, one entry per grid column
            for _ in 0..span {
                cells.push(text.clone());
            }
        }

        if !cells.is_empty() {
            grid.push(cells);
        }
    }

    if grid.is_empty() {
        return None;
    }

    let columns = disambiguate_headers(grid.remove(0));
    let rows = grid
        .into_iter()
        .map(|row| normalize_row(row, columns.len()))
        .collect();

    Some(DocumentElement::Table { columns, rows })
}

/// Extract the trimmed text content of a single cell.
fn extract_cell_text(cell: &docx_rs::TableCell) -> String {
    let mut text = String::new();

    for content in &cell.children {
        if let docx_rs::TableCellContent::Paragraph(para) = content {
            for para_child in &para.children {
                if let docx_rs::ParagraphChild::Run(run) = para_child {
                    for run_child in &run.children {
                        if let docx_rs::RunChild::Text(text_elem) = run_child {
                            if !text.is_empty() && !text.ends_with(' ') {
                                text.push(' ');
                            }
                            text.push_str(&text_elem.text);
                        }
                    }
                }
            }
        }
    }

    text.trim().to_string()
}

/// Turn the first physical row into a unique, non-empty set of column names.
///
/// Blank headers become `Column_<i>` (1-based position). A duplicate gets
/// the smallest `_<n>` suffix that makes it unique, scanning in header
/// order, so `["Name", "Name", ""]` becomes `["Name", "Name_1", "Column_3"]`.
pub(crate) fn disambiguate_headers(raw: Vec<String>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::with_capacity(raw.len());

    for (index, header) in raw.into_iter().enumerate() {
        let base = header.trim().to_string();
        let base = if base.is_empty() {
            format!("Column_{}", index + 1)
        } else {
            base
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while columns.contains(&name) {
            name = format!("{base}_{suffix}");
            suffix += 1;
        }
        columns.push(name);
    }

    columns
}

/// Pad a short row with empty cells, or truncate a long one, so its length
/// always equals the column count.
pub(crate) fn normalize_row(mut row: Vec<String>, width: usize) -> Vec<String> {
    if row.len() > width {
        row.truncate(width);
    } else {
        while row.len() < width {
            row.push(String::new());
        }
    }
    row
}

/// Scan the raw document XML for per-cell grid spans.
///
/// The typed document walk does not expose `w:gridSpan`, so we recover it
/// directly from `word/document.xml`. The result is indexed as
/// `[table][row][cell]` with a span of 1 for unspanned cells. Only
/// top-level tables are recorded; tables nested inside cells are ignored,
/// matching the typed walk.
pub(crate) fn scan_grid_spans(document_xml: &str) -> Vec<Vec<Vec<usize>>> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(document_xml);
    reader.trim_text(true);

    let mut tables: Vec<Vec<Vec<usize>>> = Vec::new();
    let mut table_depth = 0usize;
    let mut current_table: Vec<Vec<usize>> = Vec::new();
    let mut current_row: Vec<usize> = Vec::new();
    let mut in_cell = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:tbl" => {
                    table_depth += 1;
                    if table_depth == 1 {
                        current_table = Vec::new();
                    }
                }
                b"w:tr" if table_depth == 1 => {
                    current_row = Vec::new();
                }
                b"w:tc" if table_depth == 1 => {
                    in_cell = true;
                    current_row.push(1);
                }
                b"w:gridSpan" if table_depth == 1 && in_cell => {
                    if let Some(span) = read_val_attr(e) {
                        if let Some(last) = current_row.last_mut() {
                            *last = span.max(1);
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(ref e))
                if e.name().as_ref() == b"w:gridSpan" && table_depth == 1 && in_cell =>
            {
                if let Some(span) = read_val_attr(e) {
                    if let Some(last) = current_row.last_mut() {
                        *last = span.max(1);
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:tbl" => {
                    if table_depth == 1 {
                        tables.push(std::mem::take(&mut current_table));
                    }
                    table_depth = table_depth.saturating_sub(1);
                }
                b"w:tr" if table_depth == 1 => {
                    current_table.push(std::mem::take(&mut current_row));
                }
                b"w:tc" if table_depth == 1 => {
                    in_cell = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    tables
}

/// Read a numeric `w:val` attribute from an element.
fn read_val_attr(e: &quick_xml::events::BytesStart<'_>) -> Option<usize> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == b"w:val" {
            return String::from_utf8_lossy(&attr.value).parse().ok();
        }
    }
    None
}
