// Loads the two files the demo needs at startup: the background image and
// the font. Missing or broken files never stop the program; the caller gets
// an empty image or no font bytes and a warning lands in the log.

use std::fs;
use std::path::Path;

use image::RgbaImage;
use log::{info, warn};

use crate::error::Error;

/// Read and decode an image file into RGBA8 pixels.
pub fn load_image(path: &Path) -> Result<RgbaImage, Error> {
    let bytes = fs::read(path).map_err(|source| Error::AssetRead { path: path.to_path_buf(), source })?;
    let img = image::load_from_memory(&bytes)
        .map_err(|source| Error::ImageDecode { path: path.to_path_buf(), source })?;
    Ok(img.to_rgba8())
}

/// Like `load_image`, but a failure yields a 0x0 image that draws nothing.
pub fn load_image_or_empty(path: &Path) -> RgbaImage {
    match load_image(path) {
        Ok(img) => {
            info!("loaded image {} ({}x{})", path.display(), img.width(), img.height());
            img
        }
        Err(e) => {
            warn!("problem loading background image: {e}");
            RgbaImage::new(0, 0)
        }
    }
}

/// Raw bytes of a font file.
pub fn load_font_bytes(path: &Path) -> Result<Vec<u8>, Error> {
    fs::read(path).map_err(|source| Error::AssetRead { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("spotlight-assets-{}-{name}", std::process::id()))
    }

    #[test]
    fn missing_image_is_a_read_error() {
        let err = load_image(Path::new("no/such/dir/cave.png")).unwrap_err();
        assert!(matches!(err, Error::AssetRead { .. }));
    }

    #[test]
    fn garbage_image_is_a_decode_error() {
        let path = scratch("garbage.png");
        fs::write(&path, b"definitely not a png").unwrap();
        let err = load_image(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, Error::ImageDecode { .. }));
    }

    #[test]
    fn missing_image_degrades_to_empty() {
        let img = load_image_or_empty(Path::new("no/such/dir/cave.png"));
        assert_eq!(img.dimensions(), (0, 0));
    }

    #[test]
    fn png_round_trips_through_disk() {
        let path = scratch("tiny.png");
        let src = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        src.save(&path).unwrap();
        let img = load_image(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn missing_font_is_a_read_error() {
        let err = load_font_bytes(Path::new("no/such/dir/ariblk.ttf")).unwrap_err();
        assert!(err.to_string().contains("ariblk.ttf"));
    }
}
