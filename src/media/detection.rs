use super::types::ImageKind;
use image::ImageFormat;
use std::path::Path;

/// Sniff the image format from magic bytes.
#[must_use]
pub fn detect_kind(data: &[u8]) -> Option<ImageKind> {
    match image::guess_format(data).ok()? {
        ImageFormat::Png => Some(ImageKind::Png),
        ImageFormat::Jpeg => Some(ImageKind::Jpeg),
        ImageFormat::WebP => Some(ImageKind::Webp),
        _ => None,
    }
}

#[must_use]
pub fn kind_from_extension(path: &Path) -> Option<ImageKind> {
    let ext = path.extension()?.to_str()?;
    match ext.to_lowercase().as_str() {
        "png" => Some(ImageKind::Png),
        "jpg" | "jpeg" => Some(ImageKind::Jpeg),
        "webp" => Some(ImageKind::Webp),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 9] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00];

    #[test]
    fn detects_png_and_jpeg_magic_bytes() {
        assert_eq!(detect_kind(&PNG_MAGIC), Some(ImageKind::Png));
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
        assert_eq!(detect_kind(&jpeg), Some(ImageKind::Jpeg));
    }

    #[test]
    fn unknown_bytes_are_rejected() {
        assert!(detect_kind(&[0x00, 0x11, 0x22, 0x33, 0x44]).is_none());
        assert!(detect_kind(b"hello").is_none());
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(kind_from_extension(Path::new("a/photo.JPG")), Some(ImageKind::Jpeg));
        assert_eq!(kind_from_extension(Path::new("x.webp")), Some(ImageKind::Webp));
        assert!(kind_from_extension(Path::new("notes.txt")).is_none());
        assert!(kind_from_extension(Path::new("README")).is_none());
    }
}
