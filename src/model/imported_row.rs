use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumIter};
use utoipa::ToSchema;

/// Glyph a spreadsheet uses to mark a row as paid.
pub const PAID_MARKER: &str = "☑";

/// Column headers expected on the first sheet, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter)]
pub enum ImportColumn {
    #[strum(serialize = "ID")]
    Id,
    #[strum(serialize = "Name")]
    Name,
    #[strum(serialize = "Email Address")]
    Email,
    #[strum(serialize = "Salary")]
    Salary,
    #[strum(serialize = "Paid")]
    Paid,
}

/// One spreadsheet row projected onto the rendered table. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ImportedRow {
    #[schema(example = "E1")]
    pub id: String,
    #[schema(example = "Asha")]
    pub name: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "50000")]
    pub salary: String,
    #[schema(example = true)]
    pub paid: bool,
}
