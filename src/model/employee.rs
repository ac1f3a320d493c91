use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Longest identifier, in characters, the storage column accepts.
pub const MAX_ID_CHARS: usize = 191;

fn default_active() -> bool {
    true
}

/// A registered employee, stored under its `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": "E1",
        "name": "Asha",
        "father": "Ravi",
        "address": "12 Mill Road",
        "date": "2024-01-01",
        "contractor": "Northside Staffing",
        "active": true,
        "picture": "data:image/png;base64,iVBORw0KGgo="
    })
)]
pub struct EmployeeRecord {
    #[schema(example = "E1")]
    pub id: String,

    #[schema(example = "Asha")]
    pub name: String,

    #[schema(example = "Ravi")]
    pub father: String,

    #[schema(example = "12 Mill Road")]
    pub address: String,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "Northside Staffing")]
    pub contractor: String,

    /// Records written before the flag was persisted count as active.
    #[serde(default = "default_active")]
    #[schema(example = true)]
    pub active: bool,

    /// `data:<mime>;base64,<payload>`
    #[schema(example = "data:image/png;base64,iVBORw0KGgo=")]
    pub picture: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeStats {
    #[schema(example = 12)]
    pub total_employees: i64,
    #[schema(example = 9)]
    pub active_employees: i64,
}
