use crate::{
    models::LoginReqDto,
    service::session_gate::{GateError, SessionGate},
};
use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

/// Placeholder login: admits any non-empty id/password pair.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Both fields present", body = crate::service::session_gate::Admitted),
        (status = 400, description = "A field is empty", body = Object, example = json!({
            "error": "Please enter both ID and Password"
        }))
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(gate, user), fields(id = %user.id))]
pub async fn login(
    user: web::Json<LoginReqDto>,
    gate: web::Data<SessionGate>,
) -> Result<HttpResponse, GateError> {
    let admitted = gate.check(&user.id, &user.password).inspect_err(|_| {
        info!("Validation failed: empty id or password");
    })?;

    info!(redirect = %admitted.redirect, "Login accepted");
    Ok(HttpResponse::Ok().json(admitted))
}
