//! The compositing pipeline: fetch every layer's bytes in parallel, then
//! blend them sequentially in paint order onto a transparent canvas.
//!
//! Fetching is the only concurrent phase. Blending is order-dependent
//! (source-over is not commutative), so it starts only after every fetch has
//! resolved and always walks the layers in their given order, regardless of
//! fetch completion order.

use std::io::{Cursor, Seek, SeekFrom, Write};

use futures::future::try_join_all;
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageFormat, ImageReader, Rgba, RgbaImage};
use tracing::{debug, trace};

use crate::appearance::AppearanceLayer;
use crate::error::{RenderError, RenderResult};
use crate::fetch::AssetFetcher;
use crate::pose::Pose;

// ============================================================================
// CanvasSize
// ============================================================================

/// The fixed enumeration of output canvas sizes. Canvases are square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum CanvasSize {
    #[serde(rename = "SIZE_150")]
    Small,
    #[serde(rename = "SIZE_300")]
    Medium,
    #[default]
    #[serde(rename = "SIZE_600")]
    Large,
}

impl CanvasSize {
    /// Edge length in pixels.
    pub const fn pixels(self) -> u32 {
        match self {
            CanvasSize::Small => 150,
            CanvasSize::Medium => 300,
            CanvasSize::Large => 600,
        }
    }
}

// ============================================================================
// RenderSubject
// ============================================================================

/// Identifies what is being rendered, for error diagnostics only.
#[derive(Debug, Clone, Copy)]
pub struct RenderSubject {
    pub species_id: u32,
    pub color_id: u32,
    pub pose: Pose,
}

// ============================================================================
// Compositing
// ============================================================================

/// Renders an ordered, visibility-filtered layer sequence to PNG.
///
/// All layer fetches are issued at once; `try_join_all` collects the buffers
/// in layer order and drops the outstanding fetches if any one fails. The
/// blend loop then decodes and composites each buffer sequentially. A layer
/// encoded as a one-bit mask is skipped as a harmless degenerate asset; a
/// layer that fails to decode aborts the whole render.
///
/// The encoded canvas is written to `sink`, which is rewound to the start so
/// it is immediately readable.
pub async fn composite<W, F>(
    layers: &[AppearanceLayer],
    size: CanvasSize,
    fetcher: &F,
    subject: RenderSubject,
    sink: &mut W,
) -> RenderResult<()>
where
    W: Write + Seek,
    F: AssetFetcher + ?Sized,
{
    let edge = size.pixels();
    // RgbaImage::new zero-fills, i.e. fully transparent.
    let mut canvas = RgbaImage::new(edge, edge);

    let fetches = layers.iter().map(|layer| async move {
        fetcher
            .fetch(&layer.image_url)
            .await
            .map_err(|source| RenderError::AssetRetrieval {
                image_url: layer.image_url.clone(),
                source,
            })
    });
    let buffers = try_join_all(fetches).await?;

    debug!(layers = layers.len(), edge, "all layer assets fetched, compositing");

    for (layer, bytes) in layers.iter().zip(&buffers) {
        let (original_color, decoded) =
            decode_layer(bytes).map_err(|source| RenderError::BrokenLayerImage {
                layer_id: layer.id.clone(),
                zone_label: layer.zone.label.clone(),
                species_id: subject.species_id,
                color_id: subject.color_id,
                pose: subject.pose,
                source,
            })?;

        // One-bit assets are mask data, not paintable art. They are skipped,
        // never treated as an error. The check is on the encoded color type:
        // decoding widens 1-bit images to 8-bit luma, which would be
        // indistinguishable from ordinary grayscale art.
        if original_color == ExtendedColorType::L1 {
            trace!(layer = %layer.id, "skipping degenerate one-bit mask layer");
            continue;
        }

        let foreground = decoded.into_rgba8();
        trace!(layer = %layer.id, zone = %layer.zone.label, "compositing layer");
        blend_over(&mut canvas, &foreground);
    }

    canvas.write_to(sink, ImageFormat::Png)?;
    sink.seek(SeekFrom::Start(0))
        .map_err(|e| RenderError::Encode {
            source: image::ImageError::IoError(e),
        })?;

    Ok(())
}

/// Decodes one layer's bytes, reporting the color type it was encoded with
/// alongside the decoded image.
fn decode_layer(bytes: &[u8]) -> image::ImageResult<(ExtendedColorType, DynamicImage)> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?;
    let decoder = reader.into_decoder()?;
    let original_color = decoder.original_color_type();
    let decoded = DynamicImage::from_decoder(decoder)?;
    Ok((original_color, decoded))
}

/// Source-over blends `src` onto `dest` at the origin, straight alpha.
/// Pixels outside the shared area are left untouched.
fn blend_over(dest: &mut RgbaImage, src: &RgbaImage) {
    let width = dest.width().min(src.width());
    let height = dest.height().min(src.height());

    for y in 0..height {
        for x in 0..width {
            let blended = alpha_blend(*src.get_pixel(x, y), *dest.get_pixel(x, y));
            dest.put_pixel(x, y, blended);
        }
    }
}

/// Alpha blends two straight-alpha RGBA pixels (source over destination).
fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);
    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

// ============================================================================
// Tests
// ============================================================================
