use crate::{
    model::employee::{EmployeeRecord, MAX_ID_CHARS},
    store::{EmployeeStore, StoreError},
    utils::{
        data_url::{DataUrl, sniff_image_mime},
        identifier_cache::IdentifierCache,
        identifier_filter::IdentifierFilter,
    },
};
use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use chrono::NaiveDate;
use derive_more::Display;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// A file received from the signup form.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Raw signup form values, as submitted.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub id: String,
    pub name: String,
    pub father: String,
    pub address: String,
    pub date: String,
    pub contractor: String,
    pub active: bool,
    pub picture: Option<Upload>,
}

#[derive(Debug, Display)]
pub enum SignupError {
    #[display(fmt = "Please upload a picture.")]
    MissingImage,
    #[display(fmt = "Picture must be a JPEG, PNG or BMP image.")]
    InvalidImage,
    #[display(fmt = "{} is required", _0)]
    MissingField(&'static str),
    #[display(fmt = "{} must be at most {} characters", _0, _1)]
    FieldTooLong(&'static str, usize),
    #[display(fmt = "Invalid date '{}', expected YYYY-MM-DD", _0)]
    InvalidDate(String),
    #[display(fmt = "Picture is larger than {} bytes", _0)]
    PictureTooLarge(usize),
    #[display(fmt = "This employee already exists.")]
    DuplicateIdentifier(String),
    #[display(fmt = "Failed to encode picture: {}", _0)]
    Encoding(String),
    #[display(fmt = "Something went wrong, Contact with system admin")]
    Store(StoreError),
}

impl std::error::Error for SignupError {}

impl From<StoreError> for SignupError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(id) => SignupError::DuplicateIdentifier(id),
            other => SignupError::Store(other),
        }
    }
}

impl ResponseError for SignupError {
    fn status_code(&self) -> StatusCode {
        match self {
            SignupError::MissingImage
            | SignupError::InvalidImage
            | SignupError::MissingField(_)
            | SignupError::FieldTooLong(..)
            | SignupError::InvalidDate(_) => StatusCode::BAD_REQUEST,
            SignupError::PictureTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            SignupError::DuplicateIdentifier(_) => StatusCode::CONFLICT,
            SignupError::Encoding(_) | SignupError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

/// Validates signup forms and writes new employee records.
///
/// Duplicate checks go through a cuckoo filter (fast negative) and a moka
/// cache (fast positive) before falling back to the store.
pub struct Registrar {
    store: Arc<dyn EmployeeStore>,
    filter: IdentifierFilter,
    cache: IdentifierCache,
    max_picture_bytes: usize,
}

impl Registrar {
    pub fn new(store: Arc<dyn EmployeeStore>, max_picture_bytes: usize) -> Self {
        Self {
            store,
            filter: IdentifierFilter::new(),
            cache: IdentifierCache::new(),
            max_picture_bytes,
        }
    }

    pub fn store(&self) -> &Arc<dyn EmployeeStore> {
        &self.store
    }

    /// Load every stored identifier into the filter and cache.
    /// Must finish before the first signup is served.
    pub async fn warmup(&self, batch_size: usize) -> Result<usize, StoreError> {
        let ids = self.store.identifiers().await?;

        for batch in ids.chunks(batch_size.max(1)) {
            self.filter.insert_batch(batch);
            self.cache.batch_mark(batch).await;
        }

        log::info!("Identifier index warmup complete: {} employees", ids.len());
        Ok(ids.len())
    }

    /// true  => identifier AVAILABLE
    /// false => identifier TAKEN
    pub async fn is_identifier_available(&self, id: &str) -> Result<bool, StoreError> {
        // 1. filter miss is definitive
        if !self.filter.might_exist(id) {
            return Ok(true);
        }

        // 2. cache hit is definitive
        if self.cache.is_taken(id).await {
            return Ok(false);
        }

        // 3. store fallback
        let exists = self.store.exists(id).await?;
        if exists {
            self.cache.mark_taken(id).await;
        }
        Ok(!exists)
    }

    #[instrument(name = "signup", skip(self, form), fields(id = %form.id))]
    pub async fn register(&self, form: SignupForm) -> Result<EmployeeRecord, SignupError> {
        let picture = match form.picture {
            Some(p) if !p.bytes.is_empty() => p,
            _ => {
                info!("Rejected: no picture attached");
                return Err(SignupError::MissingImage);
            }
        };

        let Some(mime) = sniff_image_mime(&picture.bytes) else {
            info!(declared = ?picture.content_type, "Rejected: picture is not a JPEG, PNG or BMP");
            return Err(SignupError::InvalidImage);
        };

        let id = form.id.trim().to_string();
        let name = form.name.trim().to_string();
        let father = form.father.trim().to_string();

        for (field, value) in [("id", &id), ("name", &name), ("father", &father)] {
            if value.is_empty() {
                return Err(SignupError::MissingField(field));
            }
        }

        if id.chars().count() > MAX_ID_CHARS {
            return Err(SignupError::FieldTooLong("id", MAX_ID_CHARS));
        }

        let date = NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d")
            .map_err(|_| SignupError::InvalidDate(form.date.clone()))?;

        if picture.bytes.len() > self.max_picture_bytes {
            return Err(SignupError::PictureTooLarge(self.max_picture_bytes));
        }

        if !self.is_identifier_available(&id).await? {
            warn!("Rejected: identifier already registered");
            return Err(SignupError::DuplicateIdentifier(id));
        }

        debug!(bytes = picture.bytes.len(), "Encoding picture");

        let bytes = picture.bytes;
        let encoded = web::block(move || DataUrl::encode(mime, &bytes))
            .await
            .map_err(|e| {
                error!(error = %e, "Picture encoding task failed");
                SignupError::Encoding(e.to_string())
            })?;

        let record = EmployeeRecord {
            id,
            name,
            father,
            address: form.address.trim().to_string(),
            date,
            contractor: form.contractor.trim().to_string(),
            active: form.active,
            picture: encoded,
        };

        self.store.put(&record).await.map_err(|e| {
            if !matches!(e, StoreError::Conflict(_)) {
                error!(error = %e, "Failed to store employee record");
            }
            SignupError::from(e)
        })?;

        self.filter.insert(&record.id);
        self.cache.mark_taken(&record.id).await;

        info!("Employee registered");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3];

    fn form(id: &str) -> SignupForm {
        SignupForm {
            id: id.into(),
            name: "Asha".into(),
            father: "Ravi".into(),
            address: "12 Mill Road".into(),
            date: "2024-03-15".into(),
            contractor: "Northside".into(),
            active: true,
            picture: Some(Upload {
                file_name: Some("asha.png".into()),
                content_type: Some("image/png".into()),
                bytes: PNG.to_vec(),
            }),
        }
    }

    fn registrar() -> (Arc<MemoryStore>, Registrar) {
        let store = Arc::new(MemoryStore::new());
        let registrar = Registrar::new(store.clone(), 1024);
        (store, registrar)
    }

    #[actix_web::test]
    async fn successful_signup_stores_one_record_with_data_url() {
        let (store, registrar) = registrar();

        let record = registrar.register(form("E1")).await.unwrap();

        assert_eq!(store.len(), 1);
        let stored = store.get("E1").await.unwrap().unwrap();
        assert_eq!(stored, record);
        assert_eq!(stored.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert!(stored.active);

        let picture = DataUrl::parse(&stored.picture).unwrap();
        assert_eq!(picture.mime, "image/png");
        assert_eq!(picture.bytes, PNG);
    }

    #[actix_web::test]
    async fn missing_picture_leaves_storage_untouched() {
        let (store, registrar) = registrar();

        let mut no_file = form("E1");
        no_file.picture = None;
        let mut empty_file = form("E1");
        empty_file.picture = Some(Upload::default());

        assert!(matches!(registrar.register(no_file).await, Err(SignupError::MissingImage)));
        assert!(matches!(registrar.register(empty_file).await, Err(SignupError::MissingImage)));
        assert_eq!(store.len(), 0);
    }

    #[actix_web::test]
    async fn missing_picture_is_reported_before_blank_fields() {
        let (_, registrar) = registrar();
        let blank = SignupForm::default();

        assert!(matches!(registrar.register(blank).await, Err(SignupError::MissingImage)));
    }

    #[actix_web::test]
    async fn second_signup_with_same_id_is_rejected() {
        let (store, registrar) = registrar();
        registrar.register(form("E1")).await.unwrap();
        let first = store.raw("E1");

        let mut again = form("E1");
        again.name = "Someone else".into();
        let err = registrar.register(again).await.unwrap_err();

        assert!(matches!(err, SignupError::DuplicateIdentifier(ref id) if id == "E1"));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(store.len(), 1);
        assert_eq!(store.raw("E1"), first);
    }

    #[actix_web::test]
    async fn duplicate_detected_for_records_loaded_by_warmup() {
        let store = Arc::new(MemoryStore::new());
        Registrar::new(store.clone(), 1024).register(form("E7")).await.unwrap();

        // fresh index over a populated store
        let registrar = Registrar::new(store.clone(), 1024);
        assert_eq!(registrar.warmup(10).await.unwrap(), 1);

        assert!(!registrar.is_identifier_available("E7").await.unwrap());
        assert!(registrar.is_identifier_available("e7").await.unwrap());
        assert!(matches!(
            registrar.register(form("E7")).await,
            Err(SignupError::DuplicateIdentifier(_))
        ));
    }

    #[actix_web::test]
    async fn duplicate_caught_by_store_without_warmup() {
        let store = Arc::new(MemoryStore::new());
        Registrar::new(store.clone(), 1024).register(form("E1")).await.unwrap();

        let cold = Registrar::new(store.clone(), 1024);
        let err = cold.register(form("E1")).await.unwrap_err();

        assert!(matches!(err, SignupError::DuplicateIdentifier(_)));
        assert_eq!(store.len(), 1);
    }

    #[actix_web::test]
    async fn field_validation() {
        let (store, registrar) = registrar();

        let blank_id = form("   ");
        assert!(matches!(
            registrar.register(blank_id).await,
            Err(SignupError::MissingField("id"))
        ));

        let mut bad_date = form("E2");
        bad_date.date = "15/03/2024".into();
        assert!(matches!(registrar.register(bad_date).await, Err(SignupError::InvalidDate(_))));

        let mut big = form("E3");
        big.picture.as_mut().unwrap().bytes.resize(2048, 0);
        let err = registrar.register(big).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);

        assert_eq!(store.len(), 0);
    }

    #[actix_web::test]
    async fn inactive_flag_is_persisted() {
        let (store, registrar) = registrar();
        let mut inactive = form("E9");
        inactive.active = false;

        registrar.register(inactive).await.unwrap();

        assert!(!store.get("E9").await.unwrap().unwrap().active);
    }

    #[actix_web::test]
    async fn picture_type_comes_from_content_not_declaration() {
        let (store, registrar) = registrar();

        let mut mislabelled = form("E1");
        let upload = mislabelled.picture.as_mut().unwrap();
        upload.content_type = Some("image/jpeg".into());
        upload.file_name = Some("asha.jpg".into());
        registrar.register(mislabelled).await.unwrap();

        let mut anonymous = form("E2");
        anonymous.picture = Some(Upload {
            file_name: None,
            content_type: None,
            bytes: vec![0xff, 0xd8, 0xff, 0xe0, 0, 0x10],
        });
        registrar.register(anonymous).await.unwrap();

        let png = store.get("E1").await.unwrap().unwrap().picture;
        let jpg = store.get("E2").await.unwrap().unwrap().picture;
        assert!(png.starts_with("data:image/png;base64,"));
        assert!(jpg.starts_with("data:image/jpeg;base64,"));
    }

    #[actix_web::test]
    async fn non_image_upload_is_rejected_before_anything_else() {
        let (store, registrar) = registrar();

        let mut text = form("E1");
        text.picture = Some(Upload {
            file_name: Some("notes.txt".into()),
            content_type: Some("text/plain".into()),
            bytes: b"hello world".to_vec(),
        });
        let err = registrar.register(text).await.unwrap_err();
        assert!(matches!(err, SignupError::InvalidImage));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        // a text upload under a taken id is still reported as a bad picture
        registrar.register(form("E2")).await.unwrap();
        let mut duplicate = form("E2");
        duplicate.picture.as_mut().unwrap().bytes = b"GIF89a".to_vec();
        assert!(matches!(registrar.register(duplicate).await, Err(SignupError::InvalidImage)));

        assert_eq!(store.len(), 1);
        assert!(store.get("E1").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn overlong_identifier_is_a_client_error() {
        let (store, registrar) = registrar();

        let longest = "E".repeat(MAX_ID_CHARS);
        registrar.register(form(&longest)).await.unwrap();

        let err = registrar.register(form(&"E".repeat(MAX_ID_CHARS + 1))).await.unwrap_err();
        assert!(matches!(err, SignupError::FieldTooLong("id", MAX_ID_CHARS)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        // limit counts characters, not bytes
        let wide = "é".repeat(MAX_ID_CHARS);
        registrar.register(form(&wide)).await.unwrap();

        assert_eq!(store.len(), 2);
    }
}
