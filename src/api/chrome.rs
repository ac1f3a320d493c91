use crate::{
    models::{ChromeUpdate, ScrollPlanQuery},
    service::chrome::{self, SMOOTH_SCROLL_MS},
};
use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

/// Largest number of frames a scroll plan may request.
const MAX_FRAMES: u32 = 240;

#[derive(Serialize, ToSchema)]
pub struct ScrollPlan {
    #[schema(example = 1000)]
    pub duration_ms: u32,
    pub positions: Vec<f64>,
}

/// Apply one UI event to the current layout state
#[utoipa::path(
    post,
    path = "/api/ui/chrome",
    request_body = ChromeUpdate,
    responses(
        (status = 200, description = "Layout state after the event", body = crate::service::chrome::ChromeState)
    ),
    tag = "UI"
)]
pub async fn apply_chrome_event(body: web::Json<ChromeUpdate>) -> impl Responder {
    let update = body.into_inner();
    HttpResponse::Ok().json(update.state.apply(update.event))
}

/// easeInOutExpo positions for a smooth scroll to an anchor
#[utoipa::path(
    get,
    path = "/api/ui/scroll",
    params(
        ("from", Query, description = "Current scroll offset"),
        ("to", Query, description = "Target anchor offset"),
        ("frames", Query, description = "Number of animation frames (default 60)")
    ),
    responses(
        (status = 200, description = "Positions from start to target", body = ScrollPlan)
    ),
    tag = "UI"
)]
pub async fn scroll_plan(query: web::Query<ScrollPlanQuery>) -> impl Responder {
    let frames = query.frames.unwrap_or(60).clamp(1, MAX_FRAMES);

    HttpResponse::Ok().json(ScrollPlan {
        duration_ms: SMOOTH_SCROLL_MS,
        positions: chrome::scroll_frames(query.from, query.to, frames),
    })
}
