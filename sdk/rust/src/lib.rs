//! Async client for the QR service.

pub mod client;

pub use client::{ErrorResponse, GenerateRequest, GenerateResponse, HealthResponse, QrClient, QrClientError};
