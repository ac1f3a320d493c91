//! Placeholder login gate.
//!
//! Admits any non-empty id/secret pair. No credential is checked against any
//! authority; a real authentication boundary must replace this before the
//! portal is exposed beyond a trusted network.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

#[derive(Debug, Display, PartialEq)]
pub enum GateError {
    #[display(fmt = "Please enter both ID and Password")]
    MissingCredentials,
}

impl std::error::Error for GateError {}

impl ResponseError for GateError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct Admitted {
    #[schema(example = "Login successful!")]
    pub message: String,
    #[schema(example = "index.html")]
    pub redirect: String,
}

#[derive(Debug, Clone)]
pub struct SessionGate {
    landing: String,
}

impl SessionGate {
    pub fn new(landing: impl Into<String>) -> Self {
        Self {
            landing: landing.into(),
        }
    }

    pub fn check(&self, id: &str, secret: &str) -> Result<Admitted, GateError> {
        if id.trim().is_empty() || secret.trim().is_empty() {
            return Err(GateError::MissingCredentials);
        }

        Ok(Admitted {
            message: "Login successful!".to_string(),
            redirect: self.landing.clone(),
        })
    }
}
