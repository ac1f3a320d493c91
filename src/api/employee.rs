use crate::{
    api::form::read_form,
    config::Config,
    model::employee::{EmployeeRecord, EmployeeStats},
    models::EmployeeQuery,
    service::registrar::{Registrar, SignupForm, Upload},
    utils::data_url::DataUrl,
};
use actix_multipart::Multipart;
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<EmployeeRecord>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

/// Register Employee
#[utoipa::path(
    post,
    path = "/api/signup",
    request_body(content = crate::models::SignupUpload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Employee registered", body = Object, example = json!({
            "message": "Signup successful!",
            "id": "E1"
        })),
        (status = 400, description = "No picture, not a JPEG/PNG/BMP picture, blank or overlong field, or bad date", body = Object, example = json!({
            "error": "Please upload a picture."
        })),
        (status = 409, description = "Identifier already registered", body = Object, example = json!({
            "error": "This employee already exists."
        })),
        (status = 413, description = "Picture too large")
    ),
    tag = "Employee"
)]
pub async fn signup(
    registrar: web::Data<Registrar>,
    config: web::Data<Config>,
    payload: Multipart,
) -> actix_web::Result<impl Responder> {
    let mut form = read_form(payload, config.max_picture_bytes).await?;

    let picture = form.files.remove("picture").map(|f| Upload {
        file_name: f.file_name,
        content_type: f.content_type,
        bytes: f.bytes,
    });

    let signup = SignupForm {
        id: form.text("id"),
        name: form.text("name"),
        father: form.text("father"),
        address: form.text("address"),
        date: form.text("date"),
        contractor: form.text("contractor"),
        active: form.checked("active"),
        picture,
    };

    let record = registrar.register(signup).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Signup successful!",
        "id": record.id
    })))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employee/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee identifier")
    ),
    responses(
        (status = 200, description = "Employee found", body = EmployeeRecord),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    registrar: web::Data<Registrar>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let employee = registrar.store().get(&employee_id).await.map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        }))),
    }
}

/// Employee picture, decoded from its stored data URL
#[utoipa::path(
    get,
    path = "/api/employee/{employee_id}/picture",
    params(
        ("employee_id", Path, description = "Employee identifier")
    ),
    responses(
        (status = 200, description = "Picture bytes with their original content type"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Stored picture is not a valid data URL")
    ),
    tag = "Employee"
)]
pub async fn get_picture(
    registrar: web::Data<Registrar>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();

    let employee = registrar.store().get(&employee_id).await.map_err(|e| {
        error!(error = %e, employee_id, "Failed to fetch employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(employee) = employee else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    };

    let picture = DataUrl::parse(&employee.picture).map_err(|e| {
        error!(error = %e, employee_id, "Stored picture is unreadable");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok()
        .content_type(picture.mime)
        .body(picture.bytes))
}

#[utoipa::path(
    get,
    path = "/api/employee",
    params(
        ("page", Query, description = "Page number"),
        ("per_page", Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse)
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    registrar: web::Data<Registrar>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    debug!(page, per_page, "Fetching employees");

    let store = registrar.store();

    let total = store.count(false).await.map_err(|e| {
        error!(error = %e, "Failed to count employees");
        ErrorInternalServerError("Database error")
    })?;

    let data = store.list(page, per_page).await.map_err(|e| {
        error!(error = %e, page, per_page, "Failed to fetch employees");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/// Headcount for the HR dashboard
#[utoipa::path(
    get,
    path = "/api/employee/stats",
    responses(
        (status = 200, description = "Employee counts", body = EmployeeStats)
    ),
    tag = "Employee"
)]
pub async fn employee_stats(registrar: web::Data<Registrar>) -> actix_web::Result<impl Responder> {
    let store = registrar.store();

    let total_employees = store.count(false).await.map_err(|e| {
        error!(error = %e, "Failed to count employees");
        ErrorInternalServerError("Database error")
    })?;

    let active_employees = store.count(true).await.map_err(|e| {
        error!(error = %e, "Failed to count active employees");
        ErrorInternalServerError("Database error")
    })?;

    let stats = EmployeeStats {
        total_employees,
        active_employees,
    };

    Ok(HttpResponse::Ok().json(stats))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{Part, multipart, test_app};
    use actix_web::{http::StatusCode, test};
    use serde_json::Value;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3, 4];

    fn signup_parts(id: &str, with_picture: bool) -> Vec<Part<'static>> {
        let mut parts = vec![
            Part::text("id", id.to_string()),
            Part::text("name", "Asha".to_string()),
            Part::text("father", "Ravi".to_string()),
            Part::text("address", "12 Mill Road".to_string()),
            Part::text("date", "2024-01-01".to_string()),
            Part::text("contractor", "Northside".to_string()),
            Part::text("active", "on".to_string()),
        ];
        if with_picture {
            parts.push(Part::file("picture", "asha.png", "image/png", PNG));
        }
        parts
    }

    fn signup_request(id: &str, with_picture: bool) -> test::TestRequest {
        let (content_type, body) = multipart(&signup_parts(id, with_picture));
        test::TestRequest::post()
            .uri("/api/signup")
            .peer_addr("127.0.0.1:40000".parse().unwrap())
            .insert_header(("content-type", content_type))
            .set_payload(body)
    }

    fn get(uri: &str) -> test::TestRequest {
        test::TestRequest::get()
            .uri(uri)
            .peer_addr("127.0.0.1:40000".parse().unwrap())
    }

    #[actix_web::test]
    async fn signup_then_fetch_round_trips() {
        let (app, _) = test_app!();

        let resp = test::call_service(&app, signup_request("E1", true).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Signup successful!");

        let resp = test::call_service(&app, get("/api/employee/E1").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let record: Value = test::read_body_json(resp).await;
        assert_eq!(record["id"], "E1");
        assert_eq!(record["name"], "Asha");
        assert_eq!(record["date"], "2024-01-01");
        assert_eq!(record["active"], true);
        assert_eq!(record["picture"], "data:image/png;base64,iVBORw0KGgoBAgME");
    }

    #[actix_web::test]
    async fn signup_without_picture_is_rejected() {
        let (app, store) = test_app!();

        let resp = test::call_service(&app, signup_request("E1", false).to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Please upload a picture.");
        assert_eq!(store.len(), 0);
    }

    #[actix_web::test]
    async fn text_file_as_picture_is_rejected() {
        let (app, store) = test_app!();
        let mut parts = signup_parts("E1", false);
        parts.push(Part::file("picture", "notes.txt", "text/plain", b"hello world"));
        let (content_type, body) = multipart(&parts);

        let req = test::TestRequest::post()
            .uri("/api/signup")
            .peer_addr("127.0.0.1:40000".parse().unwrap())
            .insert_header(("content-type", content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Picture must be a JPEG, PNG or BMP image.");
        assert_eq!(store.len(), 0);
    }

    #[actix_web::test]
    async fn duplicate_signup_conflicts() {
        let (app, store) = test_app!();

        test::call_service(&app, signup_request("E1", true).to_request()).await;
        let resp = test::call_service(&app, signup_request("E1", true).to_request()).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "This employee already exists.");
        assert_eq!(store.len(), 1);
    }

    #[actix_web::test]
    async fn picture_is_served_with_its_mime_type() {
        let (app, _) = test_app!();
        test::call_service(&app, signup_request("E1", true).to_request()).await;

        let resp = test::call_service(&app, get("/api/employee/E1/picture").to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("content-type").unwrap(), "image/png");
        assert_eq!(test::read_body(resp).await.as_ref(), PNG);
    }

    #[actix_web::test]
    async fn unknown_employee_is_404() {
        let (app, _) = test_app!();

        let resp = test::call_service(&app, get("/api/employee/nobody").to_request()).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn list_and_stats() {
        let (app, _) = test_app!();
        for id in ["E2", "E1", "E3"] {
            test::call_service(&app, signup_request(id, true).to_request()).await;
        }

        let resp = test::call_service(&app, get("/api/employee?page=1&per_page=2").to_request()).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["total"], 3);
        assert_eq!(body["per_page"], 2);
        assert_eq!(body["data"][0]["id"], "E1");
        assert_eq!(body["data"][1]["id"], "E2");

        let resp = test::call_service(&app, get("/api/employee/stats").to_request()).await;
        let stats: Value = test::read_body_json(resp).await;
        assert_eq!(stats["total_employees"], 3);
        assert_eq!(stats["active_employees"], 3);
    }
}
