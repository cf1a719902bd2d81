use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};
use small_toolkit::{FileInput, ToolEngine, ToolError, ToolInput};

fn checkerboard(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 128])
        }
    });
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
    buf
}

fn input(width: u32, height: u32) -> ToolInput {
    ToolInput::new().with_file(FileInput::new("board.png", checkerboard(width, height)))
}

fn decode(bytes: &[u8]) -> DynamicImage {
    image::load_from_memory(bytes).unwrap()
}

#[test]
fn test_flip_twice_through_tools() {
    let engine = ToolEngine::builtin();
    let once = engine.run("image-flip", &input(5, 3)).unwrap();
    let once = once.as_file().unwrap();

    let twice = engine
        .run(
            "image-flip",
            &ToolInput::new().with_file(FileInput::new(once.file_name.clone(), once.bytes.clone())),
        )
        .unwrap();
    let original = decode(&checkerboard(5, 3));
    let restored = decode(&twice.as_file().unwrap().bytes);
    assert_eq!(original.to_rgba8().into_raw(), restored.to_rgba8().into_raw());
}

#[test]
fn test_crop_rejects_out_of_bounds() {
    let engine = ToolEngine::builtin();
    let base = || input(10, 10).with("x", "4").with("y", "4").with("height", "2");

    let ok = engine.run("image-crop", &base().with("width", "6")).unwrap();
    assert_eq!(decode(&ok.as_file().unwrap().bytes).dimensions(), (6, 2));

    assert!(matches!(
        engine.run("image-crop", &base().with("width", "7")),
        Err(ToolError::OutOfRangeError { .. })
    ));
}

#[test]
fn test_grayscale_to_jpeg() {
    let engine = ToolEngine::builtin();
    let output = engine
        .run(
            "image-grayscale",
            &input(6, 6).with("format", "jpeg").with("quality", "70"),
        )
        .unwrap();
    let artifact = output.as_file().unwrap();
    assert_eq!(artifact.file_name, "board-grayscale.jpg");
    assert_eq!(artifact.mime, "image/jpeg");
    assert_eq!(image::guess_format(&artifact.bytes).unwrap(), ImageFormat::Jpeg);
}

#[test]
fn test_ico_output_limited_to_256() {
    let engine = ToolEngine::builtin();
    let result = engine.run("image-convert", &input(300, 10).with("format", "ico"));
    assert!(matches!(result, Err(ToolError::OutOfRangeError { .. })));
}

#[test]
fn test_favicon_bundle_contents() {
    let engine = ToolEngine::builtin();
    let output = engine.run("favicon-generator", &input(100, 60)).unwrap();
    let artifact = output.as_file().unwrap();
    assert_eq!(artifact.file_name, "favicon.zip");
    assert_eq!(artifact.mime, "application/zip");

    let mut archive = zip::ZipArchive::new(Cursor::new(artifact.bytes.clone())).unwrap();
    let mut names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["favicon-16x16.png", "favicon-32x32.png", "favicon-48x48.png", "favicon.ico"]
    );
}

#[test]
fn test_base64_to_image_rejects_non_image() {
    let engine = ToolEngine::builtin();
    let result = engine.run(
        "base64-to-image",
        &ToolInput::new().with("data", "data:text/plain;base64,aGVsbG8="),
    );
    assert!(matches!(result, Err(ToolError::UnsupportedFileError { .. })));
}
