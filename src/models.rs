use crate::service::chrome::{ChromeEvent, ChromeState};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[serde(default)]
    #[schema(example = "E1")]
    pub id: String,
    #[serde(default)]
    #[schema(example = "secret")]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmployeeQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChromeUpdate {
    #[serde(default)]
    pub state: ChromeState,
    pub event: ChromeEvent,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScrollPlanQuery {
    pub from: f64,
    pub to: f64,
    pub frames: Option<u32>,
}

/// Multipart body of `POST /api/signup` (documentation only).
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct SignupUpload {
    #[schema(example = "E1")]
    pub id: String,
    #[schema(example = "Asha")]
    pub name: String,
    #[schema(example = "Ravi")]
    pub father: String,
    pub address: String,
    #[schema(example = "2024-01-01", format = "date")]
    pub date: String,
    pub contractor: String,
    /// Checkbox value; present and not `false`/`off`/`0` means active.
    #[schema(example = "on")]
    pub active: Option<String>,
    #[schema(value_type = String, format = Binary)]
    pub picture: Vec<u8>,
}

/// Multipart body of `POST /api/import` (documentation only).
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct ImportUpload {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
