use image::DynamicImage;

use crate::app::tools::form::{choice, file, integer, optional_integer, optional_pixels, pixels, required, FormTool};
use crate::core::image_ops::{self, CropRect, DecodedImage, FlipAxis, OutputFormat, DEFAULT_JPEG_QUALITY};
use crate::core::registry::ToolRegistry;
use crate::core::text;
use crate::domain::model::{Category, FieldSpec, FileArtifact, ToolInput, ToolOutput};
use crate::utils::error::{Result, ToolError};
use crate::utils::validation::validate_range;

const YES_NO: [&str; 2] = ["yes", "no"];

/// 未指定格式時沿用原檔格式，無法輸出的格式改存 PNG
fn output_format(input: &ToolInput, source: &DecodedImage) -> Result<OutputFormat> {
    match input.get("format") {
        Some(raw) => OutputFormat::parse(raw).ok_or_else(|| {
            ToolError::invalid_input(
                "format",
                raw,
                format!("expected one of: {}", OutputFormat::OPTIONS.join(", ")),
            )
        }),
        None => Ok(OutputFormat::from_image_format(source.format).unwrap_or(OutputFormat::Png)),
    }
}

fn quality(input: &ToolInput) -> Result<u8> {
    let value = optional_integer(input, "quality", i64::from(DEFAULT_JPEG_QUALITY))?;
    validate_range("quality", value, 1, 100)?;
    Ok(value as u8)
}

/// 解碼、套用轉換、依選定格式重新編碼
fn transform<F>(input: &ToolInput, suffix: &str, op: F) -> Result<ToolOutput>
where
    F: FnOnce(&DynamicImage) -> Result<DynamicImage>,
{
    let source = file(input)?;
    let decoded = image_ops::decode(&source.bytes)?;
    let format = output_format(input, &decoded)?;
    let jpeg_quality = quality(input)?;

    let result = op(&decoded.image)?;
    tracing::debug!(
        "🖼️ {} {}x{} -> {}x{} ({:?})",
        source.name,
        decoded.image.width(),
        decoded.image.height(),
        result.width(),
        result.height(),
        format
    );

    let bytes = image_ops::encode(&result, format, jpeg_quality)?;
    Ok(ToolOutput::File(FileArtifact::new(
        format!("{}-{}.{}", source.stem(), suffix, format.extension()),
        format.mime(),
        bytes,
    )))
}

fn image_flip(input: &ToolInput) -> Result<ToolOutput> {
    let axis = match choice(input, "direction", &["horizontal", "vertical"], Some("horizontal"))? {
        "vertical" => FlipAxis::Vertical,
        _ => FlipAxis::Horizontal,
    };
    transform(input, "flipped", |img| Ok(image_ops::flip(img, axis)))
}

fn image_rotate(input: &ToolInput) -> Result<ToolOutput> {
    let degrees = integer(input, "degrees")?;
    transform(input, "rotated", |img| image_ops::rotate(img, degrees))
}

fn image_crop(input: &ToolInput) -> Result<ToolOutput> {
    let rect = CropRect {
        x: pixels(input, "x")?,
        y: pixels(input, "y")?,
        width: pixels(input, "width")?,
        height: pixels(input, "height")?,
    };
    transform(input, "cropped", |img| image_ops::crop(img, rect))
}

fn image_resize(input: &ToolInput) -> Result<ToolOutput> {
    let width = optional_pixels(input, "width")?;
    let height = optional_pixels(input, "height")?;
    let keep_aspect = choice(input, "keep_aspect", &YES_NO, Some("yes"))? == "yes";
    transform(input, "resized", |img| image_ops::resize(img, width, height, keep_aspect))
}

fn image_grayscale(input: &ToolInput) -> Result<ToolOutput> {
    transform(input, "grayscale", |img| Ok(image_ops::grayscale(img)))
}

fn image_convert(input: &ToolInput) -> Result<ToolOutput> {
    transform(input, "converted", |img| Ok(img.clone()))
}

fn favicon_generator(input: &ToolInput) -> Result<ToolOutput> {
    let source = file(input)?;
    let decoded = image_ops::decode(&source.bytes)?;

    match choice(input, "bundle", &["zip", "ico"], Some("zip"))? {
        "ico" => Ok(ToolOutput::File(FileArtifact::new(
            "favicon.ico",
            OutputFormat::Ico.mime(),
            image_ops::favicon_ico(&decoded.image)?,
        ))),
        _ => Ok(ToolOutput::File(FileArtifact::new(
            "favicon.zip",
            "application/zip",
            image_ops::favicon_bundle(&decoded.image)?,
        ))),
    }
}

fn image_to_base64(input: &ToolInput) -> Result<ToolOutput> {
    let source = file(input)?;
    let decoded = image_ops::decode(&source.bytes)?;

    match choice(input, "output", &["data-url", "raw"], Some("data-url"))? {
        "raw" => Ok(ToolOutput::Text(text::base64_encode(&source.bytes))),
        _ => Ok(ToolOutput::Text(image_ops::to_data_url(
            decoded.format.to_mime_type(),
            &source.bytes,
        ))),
    }
}

fn base64_to_image(input: &ToolInput) -> Result<ToolOutput> {
    let (mime, bytes) = image_ops::parse_data_url(required(input, "data")?)?;
    let decoded = image_ops::decode(&bytes)?;
    let extension = match OutputFormat::from_image_format(decoded.format) {
        Some(format) => format.extension(),
        None => decoded.format.extensions_str().first().copied().unwrap_or("img"),
    };
    Ok(ToolOutput::File(FileArtifact::new(
        format!("decoded-image.{}", extension),
        mime,
        bytes,
    )))
}

fn encode_fields() -> [FieldSpec; 2] {
    [
        FieldSpec::select("format", "Output format (defaults to the source format)", &OutputFormat::OPTIONS).optional(),
        FieldSpec::number("quality", "JPEG quality (1-100)").optional(),
    ]
}

fn with_encode_fields(mut fields: Vec<FieldSpec>) -> Vec<FieldSpec> {
    fields.extend(encode_fields());
    fields
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(FormTool {
        id: "image-flip",
        name: "Flip Image",
        category: Category::Image,
        description: "Mirror an image horizontally or vertically",
        fields: || {
            with_encode_fields(vec![
                FieldSpec::file("Image"),
                FieldSpec::select("direction", "Direction", &["horizontal", "vertical"]).optional(),
            ])
        },
        compute: image_flip,
    });
    registry.register(FormTool {
        id: "image-rotate",
        name: "Rotate Image",
        category: Category::Image,
        description: "Rotate an image clockwise by a multiple of 90 degrees",
        fields: || {
            with_encode_fields(vec![
                FieldSpec::file("Image"),
                FieldSpec::number("degrees", "Degrees (multiple of 90)"),
            ])
        },
        compute: image_rotate,
    });
    registry.register(FormTool {
        id: "image-crop",
        name: "Crop Image",
        category: Category::Image,
        description: "Cut a rectangle out of an image",
        fields: || {
            with_encode_fields(vec![
                FieldSpec::file("Image"),
                FieldSpec::number("x", "Left (px)"),
                FieldSpec::number("y", "Top (px)"),
                FieldSpec::number("width", "Width (px)"),
                FieldSpec::number("height", "Height (px)"),
            ])
        },
        compute: image_crop,
    });
    registry.register(FormTool {
        id: "image-resize",
        name: "Resize Image",
        category: Category::Image,
        description: "Scale an image to a new width and/or height",
        fields: || {
            with_encode_fields(vec![
                FieldSpec::file("Image"),
                FieldSpec::number("width", "Width (px)").optional(),
                FieldSpec::number("height", "Height (px)").optional(),
                FieldSpec::select("keep_aspect", "Keep aspect ratio", &YES_NO).optional(),
            ])
        },
        compute: image_resize,
    });
    registry.register(FormTool {
        id: "image-grayscale",
        name: "Grayscale Image",
        category: Category::Image,
        description: "Remove the colour from an image",
        fields: || with_encode_fields(vec![FieldSpec::file("Image")]),
        compute: image_grayscale,
    });
    registry.register(FormTool {
        id: "image-convert",
        name: "Image Format Converter",
        category: Category::Image,
        description: "Re-encode an image as PNG, JPEG, WebP, BMP or ICO",
        fields: || {
            vec![
                FieldSpec::file("Image"),
                FieldSpec::select("format", "Output format", &OutputFormat::OPTIONS),
                FieldSpec::number("quality", "JPEG quality (1-100)").optional(),
            ]
        },
        compute: image_convert,
    });
    registry.register(FormTool {
        id: "favicon-generator",
        name: "Favicon Generator",
        category: Category::Image,
        description: "Build a 16/32/48 px favicon.ico, or a ZIP with the PNG sizes too",
        fields: || {
            vec![
                FieldSpec::file("Image"),
                FieldSpec::select("bundle", "Download", &["zip", "ico"]).optional(),
            ]
        },
        compute: favicon_generator,
    });
    registry.register(FormTool {
        id: "image-to-base64",
        name: "Image to Base64",
        category: Category::Text,
        description: "Encode an image file as a data URL or raw Base64",
        fields: || {
            vec![
                FieldSpec::file("Image"),
                FieldSpec::select("output", "Output", &["data-url", "raw"]).optional(),
            ]
        },
        compute: image_to_base64,
    });
    registry.register(FormTool {
        id: "base64-to-image",
        name: "Base64 to Image",
        category: Category::Text,
        description: "Turn a data URL or Base64 string back into an image file",
        fields: || vec![FieldSpec::text("data", "Data URL or Base64")],
        compute: base64_to_image,
    });
}
