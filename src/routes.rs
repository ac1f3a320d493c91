use crate::{
    api::{chrome, employee, import},
    auth::handlers,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

/// Per-route limiter allowing `requests_per_min` with an equal burst.
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("period and burst are non-zero");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let signup_limiter = Arc::new(build_limiter(config.rate_signup_per_min));
    let import_limiter = Arc::new(build_limiter(config.rate_import_per_min));
    let api_limiter = Arc::new(build_limiter(config.rate_api_per_min));

    // Placeholder session gate
    cfg.service(
        web::scope("/auth").service(
            web::resource("/login")
                .wrap(login_limiter)
                .route(web::post().to(handlers::login)),
        ),
    );

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(api_limiter)
            .service(
                web::resource("/signup")
                    .wrap(signup_limiter)
                    .route(web::post().to(employee::signup)),
            )
            .service(
                web::resource("/import")
                    .wrap(import_limiter)
                    .route(web::post().to(import::import_spreadsheet)),
            )
            .service(
                web::scope("/employee")
                    // /employee
                    .service(web::resource("").route(web::get().to(employee::list_employees)))
                    // /employee/stats
                    .service(web::resource("/stats").route(web::get().to(employee::employee_stats)))
                    // /employee/{id}
                    .service(web::resource("/{id}").route(web::get().to(employee::get_employee)))
                    // /employee/{id}/picture
                    .service(web::resource("/{id}/picture").route(web::get().to(employee::get_picture))),
            )
            .service(
                web::scope("/ui")
                    .service(web::resource("/chrome").route(web::post().to(chrome::apply_chrome_event)))
                    .service(web::resource("/scroll").route(web::get().to(chrome::scroll_plan))),
            ),
    );
}

// SIGNUP
//  ├─ picture present?        no  → 400
//  ├─ id already registered?  yes → 409
//  └─ encode picture, store   → 201

// IMPORT
//  └─ first sheet → rows → <tr> fragment replacing the table body
