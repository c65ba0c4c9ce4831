//! Test fixtures: encoded images with known pixels.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// Solid-colour RGBA image
pub fn solid_image(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
}

/// Image whose left half is red and right half is blue
pub fn split_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    });
    DynamicImage::ImageRgba8(img)
}

pub fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).expect("encode fixture");
    out.into_inner()
}

/// Opaque PNG of the given size
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    encode(&solid_image(width, height, [40, 160, 90, 255]), ImageFormat::Png)
}

pub fn decode(data: &[u8]) -> DynamicImage {
    image::load_from_memory(data).expect("decode result")
}

/// Family name of the bundled test font
pub const BUNDLED_FONT_FAMILY: &str = "DejaVu Sans Mono";

const BUNDLED_FONT: &[u8] = include_bytes!("../fixtures/fonts/DejaVuSansMono.ttf");

/// Font resolver that only knows the bundled font, independent of the host
pub fn bundled_font_resolver() -> imagehelper_processing::SystemFontResolver {
    let mut db = fontdb::Database::new();
    db.load_font_data(BUNDLED_FONT.to_vec());
    imagehelper_processing::SystemFontResolver::from_database(db)
}

/// Read the first QR symbol found in `img`
pub fn read_qr(img: &image::GrayImage) -> Option<String> {
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        img.width() as usize,
        img.height() as usize,
        |x, y| img.get_pixel(x as u32, y as u32).0[0],
    );
    prepared
        .detect_grids()
        .into_iter()
        .find_map(|grid| grid.decode().ok())
        .map(|(_, content)| content)
}
