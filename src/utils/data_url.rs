use base64::{Engine as _, engine::general_purpose::STANDARD};
use derive_more::Display;
use image::ImageFormat;

const PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

#[derive(Debug, Display, PartialEq)]
pub enum DataUrlError {
    #[display(fmt = "not a data URL")]
    MissingPrefix,
    #[display(fmt = "data URL is not base64 encoded")]
    NotBase64,
    #[display(fmt = "invalid base64 payload: {}", _0)]
    Payload(String),
}

/// Inline `data:<mime>;base64,<payload>` encoding of binary content.
#[derive(Debug, Clone, PartialEq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUrl {
    pub fn encode(mime: &str, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(PREFIX.len() + mime.len() + BASE64_MARKER.len() + bytes.len() * 4 / 3 + 4);
        out.push_str(PREFIX);
        out.push_str(mime);
        out.push_str(BASE64_MARKER);
        STANDARD.encode_string(bytes, &mut out);
        out
    }

    pub fn parse(text: &str) -> Result<Self, DataUrlError> {
        let rest = text.strip_prefix(PREFIX).ok_or(DataUrlError::MissingPrefix)?;
        let (mime, payload) = rest.split_once(BASE64_MARKER).ok_or(DataUrlError::NotBase64)?;

        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| DataUrlError::Payload(e.to_string()))?;

        Ok(Self {
            mime: mime.to_string(),
            bytes,
        })
    }
}

/// MIME type of a JPEG, PNG or BMP picture, judged by its leading bytes.
/// Anything else yields `None`.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        format @ (ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::Bmp) => Some(format.to_mime_type()),
        _ => None,
    }
}
