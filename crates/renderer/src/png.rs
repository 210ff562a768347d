//! PNG encoding for rendered frames.
//!
//! Frames are full-color RGB, so only truecolor PNG (color type 2) is
//! written. Scanlines are stored unfiltered and compressed with zlib.

use image::RgbImage;
use std::io::Write;
use std::path::Path;
use thermal_common::{ThermalError, ThermalResult};

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Encode an RGB image as PNG bytes.
pub fn encode_rgb(image: &RgbImage) -> ThermalResult<Vec<u8>> {
    let (width, height) = image.dimensions();
    create_png(image.as_raw(), width as usize, height as usize)
}

/// Encode `image` and write it to `path`.
pub fn write_png(image: &RgbImage, path: &Path) -> ThermalResult<()> {
    let bytes = encode_rgb(image)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Create a PNG from packed RGB pixel data (3 bytes per pixel).
pub fn create_png(pixels: &[u8], width: usize, height: usize) -> ThermalResult<Vec<u8>> {
    if pixels.len() != width * height * 3 {
        return Err(ThermalError::Render(format!(
            "expected {} RGB bytes for {}x{}, got {}",
            width * height * 3,
            width,
            height,
            pixels.len()
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(2); // color type (RGB)
    ihdr.push(0); // compression method
    ihdr.push(0); // filter method
    ihdr.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr);

    let idat = deflate_idat_rgb(pixels, width, height)?;
    write_chunk(&mut png, b"IDAT", &idat);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

fn deflate_idat_rgb(pixels: &[u8], width: usize, height: usize) -> ThermalResult<Vec<u8>> {
    let stride = width * 3;
    let mut uncompressed = Vec::with_capacity(height * (1 + stride));
    for row in pixels.chunks_exact(stride.max(1)).take(height) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }
    if stride == 0 {
        uncompressed.resize(height, 0);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&uncompressed)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_header_layout() {
        let img = RgbImage::from_pixel(3, 2, Rgb([1, 2, 3]));
        let png = encode_rgb(&img).unwrap();

        assert_eq!(&png[0..8], &SIGNATURE);
        assert_eq!(&png[12..16], b"IHDR");
        assert_eq!(u32::from_be_bytes([png[16], png[17], png[18], png[19]]), 3);
        assert_eq!(u32::from_be_bytes([png[20], png[21], png[22], png[23]]), 2);
        assert_eq!(png[24], 8);
        assert_eq!(png[25], 2);
        assert_eq!(&png[png.len() - 8..png.len() - 4], b"IEND");
    }

    #[test]
    fn test_chunk_crc() {
        let mut out = Vec::new();
        write_chunk(&mut out, b"IEND", &[]);
        // Well-known CRC of an empty IEND chunk.
        assert_eq!(&out[8..12], &[0xAE, 0x42, 0x60, 0x82]);
    }

    #[test]
    fn test_rejects_short_buffer() {
        let err = create_png(&[0; 5], 2, 1).unwrap_err();
        assert!(matches!(err, ThermalError::Render(_)));
    }

    #[test]
    fn test_decodes_with_image_crate() {
        let img = RgbImage::from_fn(5, 4, |x, y| Rgb([x as u8 * 40, y as u8 * 60, 7]));
        let png = encode_rgb(&img).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(decoded, img);
    }
}
