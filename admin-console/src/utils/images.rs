use std::path::Path;

use admin_sdk::ImageFile;

use crate::utils::errors::{ConsoleError, Result};

/// MIME type for an image file name, judged by its extension.
pub fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "tif" | "tiff" => "image/tiff",
        _ => return None,
    };
    Some(mime)
}

/// Read an image from disk for upload.
///
/// Size and count limits are left to the SDK validators so the operator
/// sees the same messages as every other client.
pub async fn load_image(path: &Path) -> Result<ImageFile> {
    let content_type =
        mime_for(path).ok_or_else(|| ConsoleError::UnsupportedImage(path.to_path_buf()))?;
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ConsoleError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    tracing::debug!("Loaded {} ({} bytes, {})", file_name, bytes.len(), content_type);
    Ok(ImageFile::new(file_name, content_type, bytes))
}

pub async fn load_images(paths: &[impl AsRef<Path>]) -> Result<Vec<ImageFile>> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        images.push(load_image(path.as_ref()).await?);
    }
    Ok(images)
}
