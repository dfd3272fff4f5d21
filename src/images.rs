//! Images
//!
//! Product images arrive either as absolute URLs (CDN uploads) or as paths
//! relative to the backend. Views and order payloads need an absolute URL
//! either way.

/// Shown when a product has no image.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400?text=No+Image";

const CLOUDINARY_HOST: &str = "res.cloudinary.com";
const CLOUDINARY_UPLOAD: &str = "/upload/";

/// Resolves image references against the backend base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResolver {
    backend_url: String,
}

impl ImageResolver {
    /// Create a resolver. Trailing slashes on the base URL are ignored.
    pub fn new(backend_url: impl AsRef<str>) -> Self {
        Self {
            backend_url: backend_url.as_ref().trim_end_matches('/').to_string(),
        }
    }

    /// The backend base URL.
    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Absolute URL for an image reference.
    ///
    /// Blank references give [`PLACEHOLDER_IMAGE`]; `http(s)` URLs are
    /// returned unchanged; anything else is joined onto the backend URL.
    pub fn resolve(&self, image_ref: Option<&str>) -> String {
        let Some(image_ref) = image_ref.map(str::trim).filter(|image| !image.is_empty()) else {
            return PLACEHOLDER_IMAGE.to_string();
        };

        if image_ref.starts_with("http") {
            return image_ref.to_string();
        }

        format!("{}/{}", self.backend_url, image_ref.trim_start_matches('/'))
    }
}

/// Ask Cloudinary for an auto-format, auto-quality rendition `width` pixels
/// wide. Other URLs are returned unchanged.
pub fn optimize_cloudinary(url: &str, width: u32) -> String {
    if !url.contains(CLOUDINARY_HOST) {
        return url.to_string();
    }

    url.replacen(
        CLOUDINARY_UPLOAD,
        &format!("{CLOUDINARY_UPLOAD}f_auto,q_auto,w_{width}/"),
        1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_relative_path() {
        let resolver = ImageResolver::new("https://api.example.pk/");

        assert_eq!(
            resolver.resolve(Some("/uploads/shawl.jpg")),
            "https://api.example.pk/uploads/shawl.jpg"
        );
    }

    #[test]
    fn resolve_absolute_url_unchanged() {
        let resolver = ImageResolver::new("https://api.example.pk");

        assert_eq!(
            resolver.resolve(Some("https://cdn.example.pk/a.png")),
            "https://cdn.example.pk/a.png"
        );
    }

    #[test]
    fn resolve_missing_gives_placeholder() {
        let resolver = ImageResolver::new("https://api.example.pk");

        assert_eq!(resolver.resolve(None), PLACEHOLDER_IMAGE);
        assert_eq!(resolver.resolve(Some("  ")), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn cloudinary_urls_get_transform() {
        let url = "https://res.cloudinary.com/shop/image/upload/v1/shawl.jpg";

        assert_eq!(
            optimize_cloudinary(url, 500),
            "https://res.cloudinary.com/shop/image/upload/f_auto,q_auto,w_500/v1/shawl.jpg"
        );
    }

    #[test]
    fn other_urls_untouched() {
        let url = "https://cdn.example.pk/upload/shawl.jpg";

        assert_eq!(optimize_cloudinary(url, 500), url);
    }
}
