use anyhow::Context;
use image::GenericImageView;

/// 解码后的图片，统一为 RGBA8
pub struct DecodedImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DecodedImage({}x{}, {} bytes)", self.width, self.height, self.pixels.len())
    }
}

/// 由文件内容猜测格式并解码，运行在 IO 线程池中
pub fn decode_rgba8(bytes: &[u8]) -> anyhow::Result<DecodedImage> {
    let _span = tracy_client::span!("decode_rgba8");
    let img = image::load_from_memory(bytes).context("decode image")?;
    let (width, height) = img.dimensions();
    let pixels = img.into_rgba8().into_raw();

    Ok(DecodedImage { pixels, width, height })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    /// 生成一张纯色 PNG
    pub(crate) fn encode_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn test_decode_png_to_rgba8() {
        let png = encode_png(3, 2, [10, 20, 30, 255]);
        let decoded = decode_rgba8(&png).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.pixels.len(), 3 * 2 * 4);
        assert_eq!(&decoded.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_rgba8(b"definitely not an image").is_err());
    }
}
