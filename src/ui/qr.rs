//! QR rasterization for the create screen. Always a 200x200 RGB image,
//! black modules on white, centered with a quiet zone.

use gtk4::gdk;
use qrcode::{Color, QrCode};
use thiserror::Error;

pub const QR_SIZE: u32 = 200;
const QUIET_MODULES: u32 = 4;

#[derive(Debug, Error)]
pub enum QrError {
    #[error("payload does not fit in a QR code: {0}")]
    Encode(#[from] qrcode::types::QrError),
}

/// Rasterized QR image. `pixels` is tightly packed RGB8.
pub struct QrImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

pub fn render(payload: &str) -> Result<QrImage, QrError> {
    let code = QrCode::new(payload.as_bytes())?;
    let modules = code.width() as u32;
    let colors = code.to_colors();

    // A version-40 code is 177 modules; with the quiet zone that still fits
    // a 200px square at scale 1.
    let total = modules + 2 * QUIET_MODULES;
    let scale = (QR_SIZE / total).max(1);
    let side = total * scale;
    let margin = QR_SIZE.saturating_sub(side) / 2;

    let mut pixels = vec![0xff_u8; (QR_SIZE * QR_SIZE * 3) as usize];
    for y in 0..modules {
        for x in 0..modules {
            if colors[(y * modules + x) as usize] != Color::Dark {
                continue;
            }
            let px0 = margin + (QUIET_MODULES + x) * scale;
            let py0 = margin + (QUIET_MODULES + y) * scale;
            for py in py0..py0 + scale {
                for px in px0..px0 + scale {
                    let at = ((py * QR_SIZE + px) * 3) as usize;
                    pixels[at..at + 3].copy_from_slice(&[0, 0, 0]);
                }
            }
        }
    }

    Ok(QrImage {
        width: QR_SIZE,
        height: QR_SIZE,
        pixels,
    })
}

pub fn texture(image: &QrImage) -> gdk::MemoryTexture {
    let bytes = glib::Bytes::from(&image.pixels[..]);
    gdk::MemoryTexture::new(
        image.width as i32,
        image.height as i32,
        gdk::MemoryFormat::R8g8b8,
        &bytes,
        (image.width * 3) as usize,
    )
}
