use crate::{
    api::form::read_form,
    config::Config,
    service::importer,
};
use actix_multipart::Multipart;
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde_json::json;
use tracing::{error, info};

/// Import Spreadsheet
#[utoipa::path(
    post,
    path = "/api/import",
    request_body(content = crate::models::ImportUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Rows of the first sheet and their rendered table body", body = crate::service::importer::ImportedTable),
        (status = 400, description = "No file uploaded"),
        (status = 422, description = "File is not a readable spreadsheet", body = Object, example = json!({
            "error": "Unable to read spreadsheet: ..."
        }))
    ),
    tag = "Import"
)]
pub async fn import_spreadsheet(
    config: web::Data<Config>,
    payload: Multipart,
) -> actix_web::Result<impl Responder> {
    let mut form = read_form(payload, config.max_import_bytes).await?;

    let file = match form.files.remove("file") {
        Some(f) if !f.bytes.is_empty() => f,
        _ => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "error": "No file uploaded"
            })));
        }
    };

    let file_name = file.file_name.clone().unwrap_or_default();
    let bytes = file.bytes;

    let table = web::block(move || importer::import(&bytes))
        .await
        .map_err(|e| {
            error!(error = %e, "Import task failed");
            ErrorInternalServerError("Internal Server Error")
        })??;

    info!(file = %file_name, rows = table.rows.len(), "Spreadsheet imported");

    Ok(HttpResponse::Ok().json(table))
}
