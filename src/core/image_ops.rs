use std::io::{Cursor, Write};

use base64::{engine::general_purpose::STANDARD, Engine};
use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageFormat};
use zip::write::{SimpleFileOptions, ZipWriter};

use crate::utils::error::{Result, ToolError};

/// 單邊像素上限，避免縮放時配置過大的緩衝區
pub const MAX_DIMENSION: u32 = 10_000;
/// ICO 格式每個圖框最大 256 × 256
pub const ICO_MAX_DIMENSION: u32 = 256;
pub const FAVICON_SIZES: [u32; 3] = [16, 32, 48];
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Webp,
    Bmp,
    Ico,
}

impl OutputFormat {
    pub const OPTIONS: [&'static str; 5] = ["png", "jpeg", "webp", "bmp", "ico"];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            "bmp" => Some(Self::Bmp),
            "ico" => Some(Self::Ico),
            _ => None,
        }
    }

    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::WebP => Some(Self::Webp),
            ImageFormat::Bmp => Some(Self::Bmp),
            ImageFormat::Ico => Some(Self::Ico),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
            Self::Ico => "image/x-icon",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
            Self::Ico => "ico",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub format: ImageFormat,
}

pub fn decode(bytes: &[u8]) -> Result<DecodedImage> {
    if bytes.is_empty() {
        return Err(ToolError::unsupported_file("the file is empty"));
    }
    let format = image::guess_format(bytes)
        .map_err(|_| ToolError::unsupported_file("unrecognized image format"))?;
    let image = image::load_from_memory_with_format(bytes, format).map_err(|e| {
        ToolError::unsupported_file(format!("could not decode {:?} image: {}", format, e))
    })?;
    Ok(DecodedImage { image, format })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    Horizontal,
    Vertical,
}

pub fn flip(image: &DynamicImage, axis: FlipAxis) -> DynamicImage {
    match axis {
        FlipAxis::Horizontal => image.fliph(),
        FlipAxis::Vertical => image.flipv(),
    }
}

/// 順時針旋轉，只接受 90 度的倍數
pub fn rotate(image: &DynamicImage, degrees: i64) -> Result<DynamicImage> {
    match degrees.rem_euclid(360) {
        0 => Ok(image.clone()),
        90 => Ok(image.rotate90()),
        180 => Ok(image.rotate180()),
        270 => Ok(image.rotate270()),
        _ => Err(ToolError::invalid_input(
            "degrees",
            degrees,
            "rotation must be a multiple of 90 degrees",
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

pub fn crop(image: &DynamicImage, rect: CropRect) -> Result<DynamicImage> {
    if rect.width == 0 || rect.height == 0 {
        return Err(ToolError::out_of_range(
            "width",
            format!("{}x{}", rect.width, rect.height),
            "crop area cannot be empty",
        ));
    }
    let right = u64::from(rect.x) + u64::from(rect.width);
    let bottom = u64::from(rect.y) + u64::from(rect.height);
    if right > u64::from(image.width()) || bottom > u64::from(image.height()) {
        return Err(ToolError::out_of_range(
            "x",
            format!("{},{} {}x{}", rect.x, rect.y, rect.width, rect.height),
            format!("crop area exceeds the {}x{} image", image.width(), image.height()),
        ));
    }
    Ok(image.crop_imm(rect.x, rect.y, rect.width, rect.height))
}

/// 只給一邊且 keep_aspect 時，另一邊依比例推算
pub fn resize(
    image: &DynamicImage,
    width: Option<u32>,
    height: Option<u32>,
    keep_aspect: bool,
) -> Result<DynamicImage> {
    let (src_w, src_h) = (image.width().max(1), image.height().max(1));
    let (target_w, target_h) = match (width, height) {
        (None, None) => return Err(ToolError::missing("width")),
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => (w, scale_side(src_h, w, src_w)),
        (None, Some(h)) => (scale_side(src_w, h, src_h), h),
    };

    for (field, value) in [("width", target_w), ("height", target_h)] {
        if value == 0 || value > MAX_DIMENSION {
            return Err(ToolError::out_of_range(
                field,
                value,
                format!("must be between 1 and {} pixels", MAX_DIMENSION),
            ));
        }
    }

    if keep_aspect && width.is_some() && height.is_some() {
        // 在指定框內等比例縮放
        Ok(image.resize(target_w, target_h, FilterType::Lanczos3))
    } else {
        Ok(image.resize_exact(target_w, target_h, FilterType::Lanczos3))
    }
}

fn scale_side(side: u32, target: u32, reference: u32) -> u32 {
    let scaled = (u64::from(side) * u64::from(target) + u64::from(reference) / 2) / u64::from(reference);
    scaled.clamp(1, u64::from(u32::MAX)) as u32
}

pub fn grayscale(image: &DynamicImage) -> DynamicImage {
    image.grayscale()
}

pub fn encode(image: &DynamicImage, format: OutputFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            // JPEG 不支援透明度
            let rgb = image.to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut buf, jpeg_quality.clamp(1, 100));
            encoder.encode_image(&rgb)?;
        }
        OutputFormat::Ico => {
            if image.width() > ICO_MAX_DIMENSION || image.height() > ICO_MAX_DIMENSION {
                return Err(ToolError::out_of_range(
                    "format",
                    format!("{}x{}", image.width(), image.height()),
                    format!("ICO images are limited to {0}x{0}", ICO_MAX_DIMENSION),
                ));
            }
            DynamicImage::ImageRgba8(image.to_rgba8())
                .write_to(&mut Cursor::new(&mut buf), ImageFormat::Ico)?;
        }
        OutputFormat::Webp => {
            DynamicImage::ImageRgba8(image.to_rgba8())
                .write_to(&mut Cursor::new(&mut buf), ImageFormat::WebP)?;
        }
        OutputFormat::Bmp => {
            DynamicImage::ImageRgba8(image.to_rgba8())
                .write_to(&mut Cursor::new(&mut buf), ImageFormat::Bmp)?;
        }
        OutputFormat::Png => {
            image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
        }
    }
    Ok(buf)
}

pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// 接受完整 data URL 或純 Base64；後者由內容猜測 MIME
pub fn parse_data_url(raw: &str) -> Result<(String, Vec<u8>)> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ToolError::missing("data"));
    }

    let (declared_mime, payload) = match trimmed.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest.split_once(',').ok_or_else(|| {
                ToolError::invalid_input("data", truncate(trimmed), "data URL has no ',' separator")
            })?;
            let mime = header.strip_suffix(";base64").ok_or_else(|| {
                ToolError::invalid_input("data", truncate(trimmed), "only base64 data URLs are supported")
            })?;
            (Some(mime.to_string()), payload)
        }
        None => (None, trimmed),
    };

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    let mime = match declared_mime.filter(|m| !m.is_empty()) {
        Some(m) => m,
        None => image::guess_format(&bytes)
            .ok()
            .and_then(OutputFormat::from_image_format)
            .map(|f| f.mime().to_string())
            .ok_or_else(|| ToolError::unsupported_file("could not detect the image type"))?,
    };
    Ok((mime, bytes))
}

fn truncate(s: &str) -> String {
    s.chars().take(32).collect()
}

/// 置中裁成正方形再縮成各尺寸，合成一個多圖框 ICO
pub fn favicon_ico(image: &DynamicImage) -> Result<Vec<u8>> {
    let square = center_square(image);
    let frames_raw: Vec<(u32, Vec<u8>)> = FAVICON_SIZES
        .iter()
        .map(|&size| {
            let resized = square.resize_exact(size, size, FilterType::Lanczos3);
            (size, resized.to_rgba8().into_raw())
        })
        .collect();

    let frames = frames_raw
        .iter()
        .map(|(size, raw)| IcoFrame::as_png(raw, *size, *size, ExtendedColorType::Rgba8))
        .collect::<image::ImageResult<Vec<_>>>()?;

    let mut buf = Vec::new();
    IcoEncoder::new(&mut buf).encode_images(&frames)?;
    Ok(buf)
}

/// favicon.ico 加上各尺寸 PNG 的 ZIP 包
pub fn favicon_bundle(image: &DynamicImage) -> Result<Vec<u8>> {
    let square = center_square(image);
    let ico = favicon_ico(&square)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file("favicon.ico", SimpleFileOptions::default())?;
    zip.write_all(&ico)?;

    for size in FAVICON_SIZES {
        let png = encode(
            &square.resize_exact(size, size, FilterType::Lanczos3),
            OutputFormat::Png,
            DEFAULT_JPEG_QUALITY,
        )?;
        zip.start_file(format!("favicon-{0}x{0}.png", size), SimpleFileOptions::default())?;
        zip.write_all(&png)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn center_square(image: &DynamicImage) -> DynamicImage {
    let side = image.width().min(image.height());
    if image.width() == image.height() {
        return image.clone();
    }
    let x = (image.width() - side) / 2;
    let y = (image.height() - side) / 2;
    image.crop_imm(x, y, side, side)
}
