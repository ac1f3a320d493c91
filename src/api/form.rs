use actix_multipart::Multipart;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use futures_util::StreamExt;
use serde_json::json;
use std::collections::HashMap;

#[derive(Debug, Display)]
pub enum FormError {
    #[display(fmt = "Malformed form data: {}", _0)]
    Malformed(String),
    #[display(fmt = "Field '{}' is larger than {} bytes", field, limit)]
    TooLarge { field: String, limit: usize },
}

impl std::error::Error for FormError {}

impl ResponseError for FormError {
    fn status_code(&self) -> StatusCode {
        match self {
            FormError::Malformed(_) => StatusCode::BAD_REQUEST,
            FormError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[derive(Debug, Clone)]
pub struct FormFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A fully buffered multipart form.
#[derive(Debug, Default)]
pub struct FormData {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, FormFile>,
}

impl FormData {
    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    /// HTML checkbox semantics: present means checked.
    pub fn checked(&self, name: &str) -> bool {
        match self.fields.get(name) {
            Some(v) => !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "off" | "0"),
            None => false,
        }
    }
}

/// Buffer every part. Parts carrying a filename are files, the rest text.
pub async fn read_form(mut payload: Multipart, max_part_bytes: usize) -> Result<FormData, FormError> {
    let mut form = FormData::default();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| FormError::Malformed(e.to_string()))?;

        let name = field.name().to_string();
        let file_name = field.content_disposition().get_filename().map(str::to_string);
        let content_type = field.content_type().map(|m| m.essence_str().to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| FormError::Malformed(e.to_string()))?;
            if bytes.len() + data.len() > max_part_bytes {
                return Err(FormError::TooLarge {
                    field: name,
                    limit: max_part_bytes,
                });
            }
            bytes.extend_from_slice(&data);
        }

        if file_name.is_some() {
            form.files.insert(
                name,
                FormFile {
                    file_name: file_name.filter(|f| !f.is_empty()),
                    content_type,
                    bytes,
                },
            );
        } else {
            form.fields.insert(name, String::from_utf8_lossy(&bytes).into_owned());
        }
    }

    Ok(form)
}
