//! DICOM decode: JPEG preview rendering and tag extraction.

use std::path::Path;

use anyhow::Context as _;
use chrono::NaiveDate;
use dicom_object::FileDicomObject;
use dicom_object::mem::InMemDicomObject;
use dicom_pixeldata::PixelDecoder as _;
use image::codecs::jpeg::JpegEncoder;
use image::{GrayImage, Luma};

const JPEG_QUALITY: u8 = 85;
const PLACEHOLDER_SIDE: u32 = 512;

/// Render a JPEG preview of the stored DICOM file.
///
/// Decode failure degrades to a solid-gray placeholder instead of failing the
/// request; only the decode path is allowed to degrade.
pub fn render_preview(path: &Path) -> Vec<u8> {
    match decode_to_jpeg(path) {
        Ok(jpeg) => jpeg,
        Err(e) => {
            tracing::warn!(error = %e, path = %path.display(), "DICOM decode failed, serving placeholder preview");
            placeholder_jpeg()
        }
    }
}

fn decode_to_jpeg(path: &Path) -> anyhow::Result<Vec<u8>> {
    let obj = dicom_object::open_file(path).context("open DICOM file")?;
    let decoded = obj.decode_pixel_data().context("decode pixel data")?;

    let rows = decoded.rows() as usize;
    let columns = decoded.columns() as usize;
    let samples = decoded.samples_per_pixel().max(1) as usize;

    let values: Vec<f32> = decoded.to_vec().context("convert pixel data")?;
    let frame = values
        .get(..rows * columns * samples)
        .context("pixel data shorter than one frame")?;

    // First sample per pixel of the first frame; color images degrade to the
    // red channel, which is acceptable for a thumbnail.
    let luma: Vec<f32> = frame.iter().step_by(samples).copied().collect();
    let pixels = normalize_to_u8(&luma);

    let img = GrayImage::from_raw(columns as u32, rows as u32, pixels)
        .context("pixel buffer shape mismatch")?;
    encode_jpeg(&img)
}

/// Linear min-max rescale to the 0-255 range. A constant image maps to 0.
fn normalize_to_u8(values: &[f32]) -> Vec<u8> {
    let min = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = max - min;
    if !(range > 0.0) {
        return vec![0; values.len()];
    }
    values
        .iter()
        .map(|&v| (((v - min) / range) * 255.0).round().clamp(0.0, 255.0) as u8)
        .collect()
}

fn encode_jpeg(img: &GrayImage) -> anyhow::Result<Vec<u8>> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
        .encode_image(img)
        .context("encode JPEG")?;
    Ok(out)
}

fn placeholder_jpeg() -> Vec<u8> {
    let img = GrayImage::from_pixel(PLACEHOLDER_SIDE, PLACEHOLDER_SIDE, Luma([128u8]));
    // Encoding an in-memory gray buffer cannot fail for any practical reason;
    // an empty body is the last-resort fallback.
    encode_jpeg(&img).unwrap_or_default()
}

// ── Tag extraction ───────────────────────────────────────────────────────────

/// Tags lifted into dedicated columns at upload time, plus a JSON bag of
/// secondary descriptive tags.
#[derive(Debug, Clone, Default)]
pub struct DicomTags {
    pub modality: Option<String>,
    pub study_date: Option<NaiveDate>,
    pub body_part: Option<String>,
    pub metadata: serde_json::Value,
}

/// Best-effort tag extraction. An unparseable file yields empty tags — upload
/// accepts any binary, only the preview needs a decodable image.
pub fn read_tags(path: &Path) -> DicomTags {
    let Ok(obj) = dicom_object::open_file(path) else {
        return DicomTags {
            metadata: serde_json::json!({}),
            ..Default::default()
        };
    };

    let study_date = tag_str(&obj, "StudyDate")
        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y%m%d").ok());

    let mut bag = serde_json::Map::new();
    for name in ["PatientName", "StudyDescription", "SOPInstanceUID", "StudyInstanceUID"] {
        if let Some(value) = tag_str(&obj, name) {
            bag.insert(camel_to_snake(name), serde_json::Value::String(value));
        }
    }

    DicomTags {
        modality: tag_str(&obj, "Modality"),
        study_date,
        body_part: tag_str(&obj, "BodyPartExamined"),
        metadata: serde_json::Value::Object(bag),
    }
}

fn tag_str(obj: &FileDicomObject<InMemDicomObject>, name: &str) -> Option<String> {
    let value = obj.element_by_name(name).ok()?.to_str().ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn camel_to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = true;
        }
    }
    out
}
