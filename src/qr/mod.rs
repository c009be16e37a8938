//! QR request handling core.
//!
//! # Data Flow
//! ```text
//! raw request fields (JSON body or query string)
//!     → options.rs (coerce, validate → RenderRequest)
//!     → dispatcher.rs (build params, pick format/delivery)
//!     → renderer.rs (encode matrix, draw PNG or SVG)
//!     → RenderResult back to the HTTP layer
//! ```

pub mod dispatcher;
pub mod options;
pub mod renderer;

pub use dispatcher::{Delivery, RenderDispatcher, RenderError, RenderResult};
pub use options::{validate, OutputFormat, RawOptions, RenderRequest, ValidationError};
pub use renderer::{QrCodeRenderer, QrRenderer, RenderParams};
