//! Request validation and option normalization.
//!
//! # Responsibilities
//! - Accept raw, untyped input from a JSON body or query string
//! - Coerce and range-check every option in a fixed order
//! - Produce an immutable [`RenderRequest`] or the first [`ValidationError`]
//!
//! # Design Decisions
//! - First failure wins; errors are not aggregated
//! - The target string is kept exactly as received (no normalization)
//! - `RenderRequest` fields are private: `validate` is the only constructor

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

/// Smallest accepted edge length in pixels.
pub const MIN_PIXEL_SIZE: u32 = 100;
/// Largest accepted edge length in pixels.
pub const MAX_PIXEL_SIZE: u32 = 1000;
/// Edge length used when none is requested.
pub const DEFAULT_PIXEL_SIZE: u32 = 200;

/// Image encoding requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PNG.
    #[default]
    Png,
    /// SVG.
    Svg,
}

impl OutputFormat {
    /// Wire name, as accepted in the `format` option.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Svg => "image/svg+xml",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "png" => Some(OutputFormat::Png),
            "svg" => Some(OutputFormat::Svg),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated render request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderRequest {
    target: String,
    format: OutputFormat,
    pixel_size: u32,
    transparent_background: bool,
}

impl RenderRequest {
    /// The text to encode, exactly as supplied.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Edge length of the output image, always within bounds.
    pub fn pixel_size(&self) -> u32 {
        self.pixel_size
    }

    pub fn transparent_background(&self) -> bool {
        self.transparent_background
    }
}

/// Why a request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("URL is required")]
    MissingTarget,
    #[error("Invalid URL format")]
    InvalidTarget,
    #[error("Invalid format")]
    InvalidFormat,
    #[error("Invalid size")]
    InvalidSize,
}

impl ValidationError {
    /// Short title, returned as the `error` field.
    pub fn title(&self) -> String {
        self.to_string()
    }

    /// Corrective hint, returned as the `message` field.
    pub fn message(&self) -> String {
        match self {
            ValidationError::MissingTarget => {
                "Please provide a URL to generate a QR code".to_string()
            }
            ValidationError::InvalidTarget => "Please provide a valid URL".to_string(),
            ValidationError::InvalidFormat => {
                "Format must be either 'png' or 'svg'".to_string()
            }
            ValidationError::InvalidSize => format!(
                "Size must be between {} and {} pixels",
                MIN_PIXEL_SIZE, MAX_PIXEL_SIZE
            ),
        }
    }
}

/// Untyped request input.
///
/// Every field holds whatever the client sent; `None` means the key was absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawOptions {
    pub url: Option<Value>,
    pub format: Option<Value>,
    pub size: Option<Value>,
    pub transparent: Option<Value>,
}

impl RawOptions {
    /// Options from a JSON body (`url`, `format`, `size`, `transparentBackground`).
    pub fn from_json(mut body: Map<String, Value>) -> Self {
        Self {
            url: body.remove("url"),
            format: body.remove("format"),
            size: body.remove("size"),
            transparent: body.remove("transparentBackground"),
        }
    }

    /// Options from query parameters (`url`, `format`, `size`, `transparent`).
    pub fn from_query(mut params: HashMap<String, String>) -> Self {
        let mut take = |key: &str| params.remove(key).map(Value::String);
        Self {
            url: take("url"),
            format: take("format"),
            size: take("size"),
            transparent: take("transparent"),
        }
    }
}

/// Validate raw options into a [`RenderRequest`].
pub fn validate(raw: &RawOptions) -> Result<RenderRequest, ValidationError> {
    let target = parse_target(raw.url.as_ref())?;
    let format = parse_format(raw.format.as_ref())?;
    let pixel_size = parse_size(raw.size.as_ref())?;
    let transparent_background = parse_transparent(raw.transparent.as_ref());

    Ok(RenderRequest {
        target,
        format,
        pixel_size,
        transparent_background,
    })
}

fn parse_target(raw: Option<&Value>) -> Result<String, ValidationError> {
    let text = match raw {
        None | Some(Value::Null) => return Err(ValidationError::MissingTarget),
        Some(Value::String(s)) if s.is_empty() => return Err(ValidationError::MissingTarget),
        Some(Value::String(s)) => s,
        Some(_) => return Err(ValidationError::InvalidTarget),
    };

    match Url::parse(text) {
        Ok(url) if url.has_host() => Ok(text.clone()),
        _ => Err(ValidationError::InvalidTarget),
    }
}

fn parse_format(raw: Option<&Value>) -> Result<OutputFormat, ValidationError> {
    match raw {
        None | Some(Value::Null) => Ok(OutputFormat::default()),
        Some(Value::String(s)) => OutputFormat::parse(s).ok_or(ValidationError::InvalidFormat),
        Some(_) => Err(ValidationError::InvalidFormat),
    }
}

fn parse_size(raw: Option<&Value>) -> Result<u32, ValidationError> {
    let size = match raw {
        None | Some(Value::Null) => return Ok(DEFAULT_PIXEL_SIZE),
        Some(Value::Number(n)) => number_to_integer(n),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    }
    .ok_or(ValidationError::InvalidSize)?;

    if (i64::from(MIN_PIXEL_SIZE)..=i64::from(MAX_PIXEL_SIZE)).contains(&size) {
        // Range check above guarantees the value fits.
        Ok(size as u32)
    } else {
        Err(ValidationError::InvalidSize)
    }
}

fn number_to_integer(n: &serde_json::Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    (f.fract() == 0.0 && f.abs() < 1e15).then_some(f as i64)
}

fn parse_transparent(raw: Option<&Value>) -> bool {
    matches!(raw, Some(Value::Bool(true))) || matches!(raw, Some(Value::String(s)) if s == "true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(url: Value) -> RawOptions {
        RawOptions {
            url: Some(url),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_applied() {
        let req = validate(&raw(json!("https://example.com"))).unwrap();
        assert_eq!(req.target(), "https://example.com");
        assert_eq!(req.format(), OutputFormat::Png);
        assert_eq!(req.pixel_size(), 200);
        assert!(!req.transparent_background());
    }

    #[test]
    fn test_target_preserved_verbatim() {
        for url in [
            "https://example.com/",
            "http://example.com/a%20b?q=1#frag",
            "ftp://files.example.org/pub",
            "https://EXAMPLE.com:8443/Path/",
        ] {
            let req = validate(&raw(json!(url))).unwrap();
            assert_eq!(req.target(), url);
        }
    }

    #[test]
    fn test_missing_target() {
        assert_eq!(validate(&RawOptions::default()), Err(ValidationError::MissingTarget));
        assert_eq!(validate(&raw(json!(""))), Err(ValidationError::MissingTarget));
        assert_eq!(validate(&raw(Value::Null)), Err(ValidationError::MissingTarget));
    }

    #[test]
    fn test_missing_target_checked_first() {
        let options = RawOptions {
            url: None,
            format: Some(json!("gif")),
            size: Some(json!(5)),
            transparent: None,
        };
        assert_eq!(validate(&options), Err(ValidationError::MissingTarget));
    }

    #[test]
    fn test_invalid_target() {
        for bad in ["not-a-url", "example.com", "/relative/path", "mailto:someone@example.com", "http://"] {
            assert_eq!(
                validate(&raw(json!(bad))),
                Err(ValidationError::InvalidTarget),
                "{bad} should be rejected"
            );
        }
        assert_eq!(validate(&raw(json!(42))), Err(ValidationError::InvalidTarget));
    }

    #[test]
    fn test_format_is_case_sensitive() {
        for bad in ["PNG", "Svg", "jpeg", "", " png"] {
            let options = RawOptions {
                format: Some(json!(bad)),
                ..raw(json!("https://example.com"))
            };
            assert_eq!(validate(&options), Err(ValidationError::InvalidFormat), "{bad:?}");
        }

        let options = RawOptions {
            format: Some(json!("svg")),
            ..raw(json!("https://example.com"))
        };
        assert_eq!(validate(&options).unwrap().format(), OutputFormat::Svg);
    }

    #[test]
    fn test_format_checked_before_size() {
        let options = RawOptions {
            format: Some(json!("bmp")),
            size: Some(json!(1)),
            ..raw(json!("https://example.com"))
        };
        assert_eq!(validate(&options), Err(ValidationError::InvalidFormat));
    }

    #[test]
    fn test_size_bounds() {
        let with_size = |size: Value| RawOptions {
            size: Some(size),
            ..raw(json!("https://example.com"))
        };

        for ok in [json!(100), json!(1000), json!("300"), json!(" 450 "), json!(250.0)] {
            assert!(validate(&with_size(ok.clone())).is_ok(), "{ok} should pass");
        }
        for bad in [
            json!(99),
            json!(1001),
            json!(-200),
            json!("50"),
            json!("abc"),
            json!("300px"),
            json!(150.5),
            json!(true),
        ] {
            assert_eq!(
                validate(&with_size(bad.clone())),
                Err(ValidationError::InvalidSize),
                "{bad} should fail"
            );
        }
        assert_eq!(validate(&with_size(json!("1000"))).unwrap().pixel_size(), 1000);
    }

    #[test]
    fn test_transparent_coercion() {
        let with_flag = |flag: Option<Value>| RawOptions {
            transparent: flag,
            ..raw(json!("https://example.com"))
        };

        assert!(validate(&with_flag(Some(json!(true)))).unwrap().transparent_background());
        assert!(validate(&with_flag(Some(json!("true")))).unwrap().transparent_background());
        for other in [json!(false), json!("TRUE"), json!("1"), json!(1), json!("yes")] {
            assert!(!validate(&with_flag(Some(other))).unwrap().transparent_background());
        }
        assert!(!validate(&with_flag(None)).unwrap().transparent_background());
    }

    #[test]
    fn test_from_query_uses_short_transparent_key() {
        let params: HashMap<String, String> = [
            ("url", "https://example.com"),
            ("format", "svg"),
            ("size", "300"),
            ("transparent", "true"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let req = validate(&RawOptions::from_query(params)).unwrap();
        assert_eq!(req.format(), OutputFormat::Svg);
        assert_eq!(req.pixel_size(), 300);
        assert!(req.transparent_background());
    }

    #[test]
    fn test_from_json_uses_long_transparent_key() {
        let body = json!({
            "url": "https://example.com",
            "transparentBackground": true,
            "transparent": false,
        });
        let Value::Object(map) = body else { unreachable!() };

        let req = validate(&RawOptions::from_json(map)).unwrap();
        assert!(req.transparent_background());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ValidationError::InvalidTarget.title(), "Invalid URL format");
        assert_eq!(ValidationError::MissingTarget.title(), "URL is required");
        assert_eq!(ValidationError::InvalidFormat.title(), "Invalid format");
        assert_eq!(ValidationError::InvalidSize.title(), "Invalid size");
        assert_eq!(
            ValidationError::InvalidSize.message(),
            "Size must be between 100 and 1000 pixels"
        );
    }
}
