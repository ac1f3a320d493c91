use crate::{
    config::Config, routes, service::registrar::Registrar, service::session_gate::SessionGate,
    store::MemoryStore,
};
use actix_web::web::{Bytes, Data, ServiceConfig};
use std::sync::Arc;

const BOUNDARY: &str = "----hrm-portal-test-boundary";

pub struct Part<'a> {
    name: &'a str,
    file: Option<(&'a str, &'a str)>,
    body: Vec<u8>,
}

impl<'a> Part<'a> {
    pub fn text(name: &'a str, value: String) -> Self {
        Self {
            name,
            file: None,
            body: value.into_bytes(),
        }
    }

    pub fn file(name: &'a str, file_name: &'a str, content_type: &'a str, bytes: &[u8]) -> Self {
        Self {
            name,
            file: Some((file_name, content_type)),
            body: bytes.to_vec(),
        }
    }
}

/// Encode parts as `multipart/form-data`; returns the content type and body.
pub fn multipart(parts: &[Part<'_>]) -> (String, Bytes) {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.file {
            Some((file_name, content_type)) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: {}\r\n\r\n",
                        part.name, file_name, content_type
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(&part.body);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (
        format!("multipart/form-data; boundary={BOUNDARY}"),
        Bytes::from(body),
    )
}

pub struct TestState {
    config: Config,
    registrar: Data<Registrar>,
    gate: Data<SessionGate>,
}

impl TestState {
    pub fn install(self, cfg: &mut ServiceConfig) {
        cfg.app_data(self.registrar)
            .app_data(self.gate)
            .app_data(Data::new(self.config.clone()));
        routes::configure(cfg, self.config);
    }
}

/// Fresh in-memory store and the app state built over it.
pub fn state() -> (TestState, Arc<MemoryStore>) {
    let config = Config::for_tests();
    let store = Arc::new(MemoryStore::new());
    let registrar = Data::new(Registrar::new(store.clone(), config.max_picture_bytes));
    let gate = Data::new(SessionGate::new(config.landing_path.clone()));

    (
        TestState {
            config,
            registrar,
            gate,
        },
        store,
    )
}

/// Initialise the full route table; evaluates to `(service, store)`.
macro_rules! test_app {
    () => {{
        let (state, store) = $crate::api::test_support::state();
        let app = actix_web::test::init_service(
            actix_web::App::new().configure(move |cfg| state.install(cfg)),
        )
        .await;
        (app, store)
    }};
}

pub(crate) use test_app;
