pub mod canvas;
pub mod motifs;

use canvas::{rgb, Canvas};
use motifs::{MotifKind, Palette};

use crate::error::{OrnagenError, Result};
use crate::models::ImagePayload;

pub use motifs::classify as classify_motif;

/// Deterministic local fallback: draws a stylized motif onto a raster
/// surface and returns it PNG-encoded. Identical inputs produce
/// byte-identical payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderRenderer;

impl PlaceholderRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, prompt: &str, width: u32, height: u32) -> Result<ImagePayload> {
        if width == 0 || height == 0 {
            return Err(OrnagenError::ValidationError(
                "Image dimensions must be non-zero".into(),
            ));
        }

        let mut canvas = Canvas::new(width, height);

        let (from, to, palette) = background_for(prompt);
        canvas.fill_linear_gradient(from, to);

        let motif = motif_phrase(prompt);
        let kind = motifs::classify(motif);
        log::debug!("Placeholder motif '{}' dispatched to {:?}", motif, kind);

        let motif_size = width.min(height) as f32 * 0.6;
        motifs::draw(
            kind,
            &mut canvas,
            width as f32 / 2.0,
            height as f32 / 2.0,
            motif_size,
            &palette,
        );

        canvas.into_png_payload()
    }

    pub fn motif_kind(&self, prompt: &str) -> MotifKind {
        motifs::classify(motif_phrase(prompt))
    }
}

/// Leading motif phrase: everything before the first comma. Prompts without
/// a comma fall back to a generic ornament.
fn motif_phrase(prompt: &str) -> &str {
    match prompt.split_once(',') {
        Some((head, _)) if !head.trim().is_empty() => head.trim(),
        _ => "Ornament",
    }
}

/// Background gradient and drawing palette, chosen by style substrings of
/// the full prompt.
fn background_for(prompt: &str) -> (image::Rgb<u8>, image::Rgb<u8>, Palette) {
    let light_palette = Palette {
        base: rgb(0x333333),
        accent: rgb(0x666666),
    };
    let dark_palette = Palette {
        base: rgb(0xffffff),
        accent: rgb(0xffd700),
    };

    if prompt.contains("white papercraft") || prompt.contains("monochrome white") {
        (rgb(0xf8f8f8), rgb(0xe8e8e8), light_palette)
    } else if prompt.contains("crystal") || prompt.contains("glass") {
        (rgb(0xe3f2fd), rgb(0xbbdefb), dark_palette)
    } else if prompt.contains("Pixar") || prompt.contains("3D") {
        (rgb(0xfff3e0), rgb(0xffe0b2), dark_palette)
    } else {
        (rgb(0x667eea), rgb(0x764ba2), dark_palette)
    }
}
