//! QR rendering backends.
//!
//! # Responsibilities
//! - Encode text into a QR module matrix (delegated to the `qrcode` crate)
//! - Draw the matrix as PNG pixels or SVG markup
//! - Honour quiet zone, colours and output edge length from [`RenderParams`]
//!
//! # Design Decisions
//! - Renderers are stateless and shared behind `Arc<dyn QrRenderer>`
//! - Output edge length is `pixel_size` whenever every module gets at least one
//!   pixel; smaller requests fall back to a fixed scale instead of dropping modules
//! - SVG is built by hand so the quiet zone is not fixed to four modules

use std::fmt::Write as _;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};

use crate::config::ErrorCorrection;

/// Pixels per module when the requested edge is narrower than the symbol.
pub const FALLBACK_MODULE_PIXELS: u32 = 4;

/// An RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0, 0, 0, 0xff);
    pub const WHITE: Color = Color::rgba(0xff, 0xff, 0xff, 0xff);
    pub const TRANSPARENT_WHITE: Color = Color::rgba(0xff, 0xff, 0xff, 0x00);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb`, alpha excluded.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn is_opaque(&self) -> bool {
        self.a == 0xff
    }

    fn to_pixel(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

/// Drawing parameters handed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderParams {
    /// Output edge length in pixels.
    pub pixel_size: u32,
    /// Blank border in modules.
    pub quiet_zone: u32,
    pub foreground: Color,
    pub background: Color,
    pub ec_level: ErrorCorrection,
}

/// Errors raised while encoding or drawing a symbol.
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// A QR-rendering capability.
pub trait QrRenderer: Send + Sync {
    /// Render `text` as SVG markup.
    fn render_markup(&self, text: &str, params: &RenderParams) -> Result<String, RendererError>;

    /// Render `text` as PNG bytes.
    fn render_pixels(&self, text: &str, params: &RenderParams) -> Result<Vec<u8>, RendererError>;
}

/// Renderer backed by the `qrcode` and `image` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeRenderer;

impl QrRenderer for QrCodeRenderer {
    fn render_markup(&self, text: &str, params: &RenderParams) -> Result<String, RendererError> {
        let matrix = ModuleMatrix::encode(text, params.ec_level)?;
        Ok(matrix.to_svg(params))
    }

    fn render_pixels(&self, text: &str, params: &RenderParams) -> Result<Vec<u8>, RendererError> {
        let matrix = ModuleMatrix::encode(text, params.ec_level)?;
        let image = matrix.to_image(params);

        let mut png = Vec::new();
        PngEncoder::new(&mut png).write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )?;
        Ok(png)
    }
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::L => EcLevel::L,
            ErrorCorrection::M => EcLevel::M,
            ErrorCorrection::Q => EcLevel::Q,
            ErrorCorrection::H => EcLevel::H,
        }
    }
}

/// Square grid of dark/light modules, quiet zone excluded.
struct ModuleMatrix {
    width: usize,
    dark: Vec<bool>,
}

impl ModuleMatrix {
    fn encode(text: &str, ec_level: ErrorCorrection) -> Result<Self, RendererError> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), ec_level.into())?;
        Ok(Self {
            width: code.width(),
            dark: code
                .to_colors()
                .into_iter()
                .map(|c| c == qrcode::Color::Dark)
                .collect(),
        })
    }

    fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.dark[y * self.width + x]
    }

    /// Module count along one edge, quiet zone included.
    fn span(&self, quiet_zone: u32) -> u64 {
        (self.width + 2 * quiet_zone as usize) as u64
    }

    /// Edge length of the PNG: `pixel_size`, or the fixed scale if that
    /// would leave modules without a pixel.
    fn image_edge(&self, params: &RenderParams) -> u32 {
        let span = self.span(params.quiet_zone);
        if u64::from(params.pixel_size) >= span {
            params.pixel_size
        } else {
            span as u32 * FALLBACK_MODULE_PIXELS
        }
    }

    fn to_image(&self, params: &RenderParams) -> RgbaImage {
        let edge = self.image_edge(params);
        let size = u64::from(edge);
        let span = self.span(params.quiet_zone);
        let margin = u64::from(params.quiet_zone);
        let fg = params.foreground.to_pixel();
        let bg = params.background.to_pixel();

        // Pixel → module index, then shift out of the quiet zone.
        let module_at = |p: u32| (u64::from(p) * span / size).checked_sub(margin);

        RgbaImage::from_fn(edge, edge, |x, y| {
            match (module_at(x), module_at(y)) {
                (Some(mx), Some(my)) if self.is_dark(mx as usize, my as usize) => fg,
                _ => bg,
            }
        })
    }

    fn to_svg(&self, params: &RenderParams) -> String {
        let span = self.span(params.quiet_zone);
        let margin = params.quiet_zone as usize;

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {span} {span}" shape-rendering="crispEdges">"#,
            size = params.pixel_size,
            span = span,
        );

        if params.background.a > 0 {
            let _ = write!(
                svg,
                r#"<path {} d="M0 0h{span}v{span}H0z"/>"#,
                color_attr("fill", params.background),
            );
        }

        let mut path = String::new();
        for y in 0..self.width {
            let mut x = 0;
            while x < self.width {
                if !self.is_dark(x, y) {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < self.width && self.is_dark(x, y) {
                    x += 1;
                }
                // Strokes are centred on the row, hence the half-module offset.
                let _ = write!(path, "M{} {}.5h{}", start + margin, y + margin, x - start);
            }
        }

        let _ = write!(
            svg,
            r#"<path {} d="{}"/></svg>"#,
            color_attr("stroke", params.foreground),
            path
        );
        svg
    }
}

fn color_attr(attr: &str, color: Color) -> String {
    if color.is_opaque() {
        format!(r#"{}="{}""#, attr, color.hex())
    } else {
        let opacity = format!("{:.2}", f32::from(color.a) / 255.0);
        format!(
            r#"{attr}="{}" {attr}-opacity="{}""#,
            color.hex(),
            opacity.trim_start_matches('0')
        )
    }
}
