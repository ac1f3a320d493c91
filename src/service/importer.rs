use crate::model::imported_row::{ImportColumn, ImportedRow, PAID_MARKER};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use derive_more::Display;
use handlebars::Handlebars;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::json;
use std::io::Cursor;
use strum::IntoEnumIterator;
use tracing::{debug, warn};
use utoipa::ToSchema;

const TABLE_BODY: &str = "table_body";

static TEMPLATES: Lazy<Handlebars<'static>> = Lazy::new(|| {
    let mut hb = Handlebars::new();
    hb.register_template_string(TABLE_BODY, include_str!("../../templates/table_body.hbs"))
        .expect("table body template is valid");
    hb
});

#[derive(Debug, Display)]
pub enum ImportError {
    #[display(fmt = "Unable to read spreadsheet: {}", _0)]
    ParseFailure(String),
    #[display(fmt = "Failed to render table: {}", _0)]
    Render(String),
}

impl std::error::Error for ImportError {}

impl ResponseError for ImportError {
    fn status_code(&self) -> StatusCode {
        match self {
            ImportError::ParseFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ImportError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

/// Parsed rows plus the `<tbody>` markup that replaces whatever was rendered before.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportedTable {
    pub rows: Vec<ImportedRow>,
    #[schema(example = "<tr><td>E1</td><td>Asha</td><td>a@x.com</td><td>50000</td><td><input type=\"checkbox\" checked></td></tr>")]
    pub html: String,
}

/// Parse and render in one step.
pub fn import(bytes: &[u8]) -> Result<ImportedTable, ImportError> {
    let rows = parse_first_sheet(bytes)?;
    let html = render_table_body(&rows)?;
    Ok(ImportedTable { rows, html })
}

/// Read the first sheet of any workbook format calamine recognises, or a
/// UTF-8 CSV file when calamine cannot detect a workbook.
///
/// The first row is the header row. Rows with no values are skipped.
pub fn parse_first_sheet(bytes: &[u8]) -> Result<Vec<ImportedRow>, ImportError> {
    let mut workbook = match open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())) {
        Ok(workbook) => workbook,
        Err(e) => {
            return parse_csv(bytes).ok_or_else(|| {
                warn!(error = %e, "Unreadable spreadsheet upload");
                ImportError::ParseFailure(e.to_string())
            });
        }
    };

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::ParseFailure("workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::ParseFailure(e.to_string()))?;

    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let Some(header) = rows.next() else {
        debug!(sheet = %sheet_name, "First sheet is empty");
        return Ok(Vec::new());
    };

    let imported = project(&header, rows);
    debug!(sheet = %sheet_name, rows = imported.len(), "Parsed spreadsheet");
    Ok(imported)
}

/// CSV fallback. Returns `None` unless the text parses and its header row
/// names at least one expected column.
fn parse_csv(bytes: &[u8]) -> Option<Vec<ImportedRow>> {
    let text = std::str::from_utf8(bytes).ok()?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let records: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.map(|record| record.iter().map(str::to_string).collect()))
        .collect::<Result<_, csv::Error>>()
        .map_err(|e| debug!(error = %e, "Upload is not CSV either"))
        .ok()?;

    let mut rows = records.into_iter();
    let header = rows.next()?;
    let recognised = ImportColumn::iter().any(|col| header.iter().any(|h| h.trim() == col.as_ref()));
    if !recognised {
        return None;
    }

    let imported = project(&header, rows);
    debug!(rows = imported.len(), "Parsed CSV upload");
    Some(imported)
}

/// Map data rows onto the expected columns by header name.
fn project(header: &[String], rows: impl Iterator<Item = Vec<String>>) -> Vec<ImportedRow> {
    // column index for each expected header; absent headers yield empty cells
    let positions: Vec<(ImportColumn, Option<usize>)> = ImportColumn::iter()
        .map(|col| {
            let idx = header.iter().position(|cell| cell.trim() == col.as_ref());
            (col, idx)
        })
        .collect();

    let cell = |row: &[String], col: ImportColumn| -> String {
        positions
            .iter()
            .find(|(c, _)| *c == col)
            .and_then(|(_, idx)| *idx)
            .and_then(|i| row.get(i))
            .cloned()
            .unwrap_or_default()
    };

    rows.filter(|row| row.iter().any(|c| !c.is_empty()))
        .map(|row| {
            let salary = cell(&row, ImportColumn::Salary);
            ImportedRow {
                id: cell(&row, ImportColumn::Id),
                name: cell(&row, ImportColumn::Name),
                email: cell(&row, ImportColumn::Email),
                salary: if salary.is_empty() { "0".to_string() } else { salary },
                paid: cell(&row, ImportColumn::Paid) == PAID_MARKER,
            }
        })
        .collect()
}

/// Render rows as `<tr>` elements, one per row in input order.
pub fn render_table_body(rows: &[ImportedRow]) -> Result<String, ImportError> {
    TEMPLATES
        .render(TABLE_BODY, &json!({ "rows": rows }))
        .map_err(|e| ImportError::Render(e.to_string()))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        // integral floats render without a trailing ".0"
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}
