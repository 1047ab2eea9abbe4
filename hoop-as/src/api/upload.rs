//! Multipart clip uploads
//!
//! Reads the form fields shared by both analysis endpoints and validates the
//! clip bytes: non-empty, within the size limit, and recognised as a video
//! container by its magic bytes.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;

use hoop_common::api::FIELD_VIDEO;

use crate::analysis::ClipPayload;
use crate::error::{ApiError, ApiResult};

/// Parsed multipart form
#[derive(Debug, Default)]
pub struct UploadForm {
    video: Option<Bytes>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Read every field of `multipart`
    pub async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == FIELD_VIDEO {
                let bytes = field.bytes().await.map_err(multipart_error)?;
                form.video = Some(bytes);
            } else {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Trimmed text field, `None` when missing or blank
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Required trimmed text field
    pub fn require_text(&self, name: &str) -> ApiResult<&str> {
        self.text(name)
            .ok_or_else(|| ApiError::BadRequest(format!("Missing form field '{name}'")))
    }

    /// Validated clip from the `video` field
    pub fn clip(&mut self, max_clip_bytes: usize) -> ApiResult<ClipPayload> {
        let bytes = self
            .video
            .take()
            .ok_or_else(|| ApiError::BadRequest(format!("Missing form field '{FIELD_VIDEO}'")))?;
        validate_clip(bytes, max_clip_bytes)
    }
}

/// Check size and container type of an uploaded clip
pub fn validate_clip(bytes: Bytes, max_clip_bytes: usize) -> ApiResult<ClipPayload> {
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded clip is empty".to_string()));
    }
    if bytes.len() > max_clip_bytes {
        return Err(ApiError::PayloadTooLarge(format!(
            "Clip is {} bytes; limit is {} bytes",
            bytes.len(),
            max_clip_bytes
        )));
    }

    match infer::get(&bytes) {
        Some(kind) if kind.matcher_type() == infer::MatcherType::Video => Ok(ClipPayload {
            mime_type: kind.mime_type().to_string(),
            bytes,
        }),
        Some(kind) => Err(ApiError::UnsupportedMediaType(format!(
            "Expected a video clip, got {}",
            kind.mime_type()
        ))),
        None => Err(ApiError::UnsupportedMediaType(
            "Uploaded clip is not a recognised video container".to_string(),
        )),
    }
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::BadRequest(format!("Malformed multipart body: {}", err.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mp4_bytes() -> Bytes {
        let mut data = vec![0x00, 0x00, 0x00, 0x18];
        data.extend_from_slice(b"ftypisom");
        data.extend_from_slice(&[0x00, 0x00, 0x02, 0x00]);
        data.extend_from_slice(b"isomiso2avc1mp41");
        data.resize(256, 0);
        Bytes::from(data)
    }

    #[test]
    fn test_accepts_mp4() {
        let clip = validate_clip(mp4_bytes(), 1024).unwrap();
        assert_eq!(clip.mime_type, "video/mp4");
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            validate_clip(Bytes::new(), 1024),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_rejects_oversized() {
        assert!(matches!(
            validate_clip(mp4_bytes(), 100),
            Err(ApiError::PayloadTooLarge(_))
        ));
    }

    #[test]
    fn test_rejects_non_video() {
        let png = Bytes::from_static(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0]);
        assert!(matches!(
            validate_clip(png, 1024),
            Err(ApiError::UnsupportedMediaType(_))
        ));
        assert!(matches!(
            validate_clip(Bytes::from_static(b"not a video at all"), 1024),
            Err(ApiError::UnsupportedMediaType(_))
        ));
    }
}
