//! Shared helpers for integration tests
#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use tracing_subscriber::EnvFilter;

/// Route crate logs to the test harness; `RUST_LOG` picks the level
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Transparent image with the given pixels painted opaque
pub fn sparse_image(width: u32, height: u32, painted: &[(u32, u32, [u8; 3])]) -> RgbaImage {
    let mut image = RgbaImage::new(width, height);
    for &(x, y, [r, g, b]) in painted {
        image.put_pixel(x, y, Rgba([r, g, b, 255]));
    }
    image
}
