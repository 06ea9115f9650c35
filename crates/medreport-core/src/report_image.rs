//! Report image loading.
//!
//! Images are decoded once locally so undecodable uploads are rejected before
//! any model call. Formats the Gemini API accepts inline are forwarded as the
//! original bytes; anything else is re-encoded to PNG.

use crate::error::{ReportError, ReportResult};
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::Path;

/// A decoded report image, ready to be sent inline.
#[derive(Clone)]
pub struct ReportImage {
    bytes: Vec<u8>,
    format: ImageFormat,
    width: u32,
    height: u32,
}

impl std::fmt::Debug for ReportImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportImage")
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl ReportImage {
    /// Decode an in-memory image on the blocking pool.
    pub async fn decode(bytes: Vec<u8>) -> ReportResult<Self> {
        tokio::task::spawn_blocking(move || Self::decode_sync(bytes))
            .await
            .map_err(|e| ReportError::ImageDecode {
                message: format!("Task join error: {e}"),
            })?
    }

    /// Read and decode an image file.
    pub async fn open(path: &Path) -> ReportResult<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| ReportError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::decode(bytes).await
    }

    /// Synchronous decode (runs in spawn_blocking).
    pub fn decode_sync(bytes: Vec<u8>) -> ReportResult<Self> {
        let reader = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(|e| ReportError::ImageDecode {
                message: format!("Cannot detect image format: {e}"),
            })?;
        let format = reader.format().ok_or_else(|| ReportError::ImageDecode {
            message: "cannot identify image file".to_string(),
        })?;
        let image = reader.decode().map_err(|e| ReportError::ImageDecode {
            message: e.to_string(),
        })?;
        let (width, height) = image.dimensions();

        if is_inline_format(format) {
            return Ok(Self {
                bytes,
                format,
                width,
                height,
            });
        }

        tracing::debug!(?format, "Re-encoding report image as PNG for upload");
        Ok(Self {
            bytes: encode_png(&image)?,
            format: ImageFormat::Png,
            width,
            height,
        })
    }

    /// Bytes that will be sent to the model.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type of [`Self::bytes`].
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Formats sent as-is.
fn is_inline_format(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP
    )
}

fn encode_png(image: &DynamicImage) -> ReportResult<Vec<u8>> {
    let mut out = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .map_err(|e| ReportError::ImageDecode {
            message: format!("PNG re-encode failed: {e}"),
        })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn sample(format: ImageFormat) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(4, 3, Rgb([200u8, 10, 10]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), format)
            .unwrap();
        out
    }

    #[test]
    fn test_png_passes_through_unchanged() {
        let bytes = sample(ImageFormat::Png);
        let image = ReportImage::decode_sync(bytes.clone()).unwrap();
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.bytes(), bytes.as_slice());
        assert_eq!(image.dimensions(), (4, 3));
    }

    #[test]
    fn test_jpeg_keeps_jpeg_mime() {
        let image = ReportImage::decode_sync(sample(ImageFormat::Jpeg)).unwrap();
        assert_eq!(image.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_bmp_is_reencoded_to_png() {
        let image = ReportImage::decode_sync(sample(ImageFormat::Bmp)).unwrap();
        assert_eq!(image.mime_type(), "image/png");
        assert!(image.bytes().starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_text_bytes_are_rejected() {
        let err = ReportImage::decode_sync(b"Hemoglobin 10.2 g/dL".to_vec()).unwrap_err();
        assert!(matches!(err, ReportError::ImageDecode { .. }));
    }

    #[test]
    fn test_truncated_png_is_rejected() {
        let mut bytes = sample(ImageFormat::Png);
        bytes.truncate(20);
        assert!(ReportImage::decode_sync(bytes).is_err());
    }

    #[tokio::test]
    async fn test_open_missing_file_is_read_error() {
        let err = ReportImage::open(Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::Read { .. }));
    }

    #[tokio::test]
    async fn test_open_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.png");
        std::fs::write(&path, sample(ImageFormat::Png)).unwrap();
        let image = ReportImage::open(&path).await.unwrap();
        assert_eq!(image.dimensions(), (4, 3));
    }
}
