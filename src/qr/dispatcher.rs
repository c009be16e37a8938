//! Render dispatch.
//!
//! # Responsibilities
//! - Translate a [`RenderRequest`] into renderer parameters
//! - Call the PNG or SVG operation of the renderer
//! - Shape the output as an embedded base64 payload or raw bytes
//! - Collapse renderer failures into [`RenderError`]
//!
//! # Design Decisions
//! - Both formats support both deliveries; the HTTP layer decides which to use
//! - Rendering runs on the blocking pool under a deadline
//! - No retries: identical requests give identical output

use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::config::ErrorCorrection;
use crate::observability::metrics;
use crate::qr::options::{OutputFormat, RenderRequest};
use crate::qr::renderer::{Color, QrRenderer, RenderParams, RendererError};
use crate::resilience::timeouts::{run_blocking_with_timeout, BlockingError};

/// Quiet zone around every symbol, in modules.
pub const QUIET_ZONE_MODULES: u32 = 2;

/// How the rendered image is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Base64 payload for embedding as a data URI.
    Embedded,
    /// Image bytes for streaming as the response body.
    Raw,
}

/// Output of a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderResult {
    Embedded {
        mime_type: &'static str,
        base64_payload: String,
        request: RenderRequest,
    },
    Raw {
        mime_type: &'static str,
        bytes: Vec<u8>,
    },
}

impl RenderResult {
    pub fn mime_type(&self) -> &'static str {
        match self {
            RenderResult::Embedded { mime_type, .. } | RenderResult::Raw { mime_type, .. } => {
                mime_type
            }
        }
    }

    /// `data:<mime>;base64,<payload>` for embedded results.
    pub fn data_uri(&self) -> Option<String> {
        match self {
            RenderResult::Embedded {
                mime_type,
                base64_payload,
                ..
            } => Some(data_uri(mime_type, base64_payload)),
            RenderResult::Raw { .. } => None,
        }
    }
}

/// Format a base64 payload as a data URI.
pub fn data_uri(mime_type: &str, base64_payload: &str) -> String {
    format!("data:{};base64,{}", mime_type, base64_payload)
}

/// Why a render did not produce an image.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("QR code could not be rendered: {0}")]
    EncodingFailed(#[from] RendererError),
    #[error("QR rendering exceeded {0:?}")]
    TimedOut(Duration),
    #[error("QR rendering task failed: {0}")]
    Internal(String),
}

impl RenderError {
    /// Metric label.
    pub fn reason(&self) -> &'static str {
        match self {
            RenderError::EncodingFailed(_) => "encoding_failed",
            RenderError::TimedOut(_) => "timed_out",
            RenderError::Internal(_) => "internal",
        }
    }
}

impl From<BlockingError> for RenderError {
    fn from(err: BlockingError) -> Self {
        match err {
            BlockingError::TimedOut(limit) => RenderError::TimedOut(limit),
            BlockingError::Join(e) => RenderError::Internal(e.to_string()),
        }
    }
}

/// Calls the renderer for validated requests.
#[derive(Clone)]
pub struct RenderDispatcher {
    renderer: Arc<dyn QrRenderer>,
    ec_level: ErrorCorrection,
    timeout: Duration,
}

impl RenderDispatcher {
    pub fn new(renderer: Arc<dyn QrRenderer>, ec_level: ErrorCorrection, timeout: Duration) -> Self {
        Self {
            renderer,
            ec_level,
            timeout,
        }
    }

    /// Renderer parameters for a request.
    pub fn params_for(&self, request: &RenderRequest) -> RenderParams {
        RenderParams {
            pixel_size: request.pixel_size(),
            quiet_zone: QUIET_ZONE_MODULES,
            foreground: Color::BLACK,
            background: if request.transparent_background() {
                Color::TRANSPARENT_WHITE
            } else {
                Color::WHITE
            },
            ec_level: self.ec_level,
        }
    }

    /// Render on the calling thread.
    pub fn render_blocking(
        &self,
        request: &RenderRequest,
        delivery: Delivery,
    ) -> Result<RenderResult, RenderError> {
        let params = self.params_for(request);
        let format = request.format();

        let bytes = match format {
            OutputFormat::Svg => self
                .renderer
                .render_markup(request.target(), &params)?
                .into_bytes(),
            OutputFormat::Png => self.renderer.render_pixels(request.target(), &params)?,
        };

        Ok(match delivery {
            Delivery::Embedded => RenderResult::Embedded {
                mime_type: format.mime_type(),
                base64_payload: STANDARD.encode(&bytes),
                request: request.clone(),
            },
            Delivery::Raw => RenderResult::Raw {
                mime_type: format.mime_type(),
                bytes,
            },
        })
    }

    /// Render on the blocking pool, bounded by the configured timeout.
    pub async fn render(
        &self,
        request: &RenderRequest,
        delivery: Delivery,
    ) -> Result<RenderResult, RenderError> {
        let start = Instant::now();
        let dispatcher = self.clone();
        let owned = request.clone();

        let outcome = run_blocking_with_timeout(self.timeout, move || {
            dispatcher.render_blocking(&owned, delivery)
        })
        .await
        .map_err(RenderError::from)
        .and_then(|result| result);

        match &outcome {
            Ok(_) => {
                metrics::record_render(request.format(), start);
                tracing::debug!(
                    format = %request.format(),
                    size = request.pixel_size(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "QR code rendered"
                );
            }
            Err(e) => {
                metrics::record_render_failure(e.reason());
                tracing::error!(
                    format = %request.format(),
                    size = request.pixel_size(),
                    target_len = request.target().len(),
                    error = %e,
                    "QR rendering failed"
                );
            }
        }
        outcome
    }
}
