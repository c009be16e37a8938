//! Response shaping for rendered images.
//!
//! # Responsibilities
//! - Raw image bodies with the right `Content-Type`
//! - The JSON envelope of the `/generate-qr` endpoint

use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::qr::dispatcher::data_uri;
use crate::qr::{OutputFormat, RenderRequest, RenderResult};

/// A rendered image streamed as the response body.
#[derive(Debug)]
pub struct ImageResponse {
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl IntoResponse for ImageResponse {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, self.mime_type)], self.bytes).into_response()
    }
}

/// Success body of `POST /generate-qr`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub url: String,
    pub qr_code: String,
    pub format: OutputFormat,
    pub size: u32,
    pub transparent_background: bool,
}

impl GenerateResponse {
    pub fn new(request: &RenderRequest, qr_code: String) -> Self {
        Self {
            success: true,
            url: request.target().to_string(),
            qr_code,
            format: request.format(),
            size: request.pixel_size(),
            transparent_background: request.transparent_background(),
        }
    }
}

impl IntoResponse for RenderResult {
    fn into_response(self) -> Response {
        match self {
            RenderResult::Raw { mime_type, bytes } => ImageResponse { mime_type, bytes }.into_response(),
            RenderResult::Embedded {
                mime_type,
                base64_payload,
                request,
            } => {
                let qr_code = data_uri(mime_type, &base64_payload);
                Json(GenerateResponse::new(&request, qr_code)).into_response()
            }
        }
    }
}
