use std::path::Path;

use once_cell::sync::Lazy;
use reqwest::blocking::Client;

use super::icon::{Icon, IconFetcher};
use crate::{core::config::IconFetchConfig, BridgeError, Result};

/// Shared blocking HTTP client so that TLS and the connection pool are set up
/// once per process rather than once per icon.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    let config = IconFetchConfig::default();
    build_client(&config).unwrap_or_else(|e| {
        log::warn!("falling back to default HTTP client: {}", e);
        Client::new()
    })
});

fn build_client(config: &IconFetchConfig) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(config.connect_timeout())
        .timeout(config.timeout())
        .build()?)
}

/// Default icon fetcher: `http(s)://` through reqwest, `file://` and bare
/// paths from disk, decoded with the `image` crate.
pub struct HttpIconFetcher {
    client: Client,
}

impl HttpIconFetcher {
    /// Fetcher backed by the shared client and default timeouts
    pub fn new() -> Self {
        Self {
            client: HTTP_CLIENT.clone(),
        }
    }

    /// Fetcher with its own client built from `config`
    pub fn with_config(config: &IconFetchConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
        })
    }

    fn download(&self, uri: &str) -> Result<Vec<u8>> {
        log::debug!("fetch icon {}", uri);
        let resp = self.client.get(uri).send()?;
        if !resp.status().is_success() {
            return Err(BridgeError::IconFetchFailed {
                uri: uri.to_string(),
                reason: format!("HTTP {}", resp.status()),
            });
        }
        Ok(resp.bytes()?.to_vec())
    }
}

impl Default for HttpIconFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl IconFetcher for HttpIconFetcher {
    fn fetch(&self, uri: &str) -> Result<Icon> {
        let bytes = if uri.starts_with("http://") || uri.starts_with("https://") {
            self.download(uri)?
        } else {
            let path = uri.strip_prefix("file://").unwrap_or(uri);
            std::fs::read(Path::new(path))?
        };
        decode_icon(&bytes)
    }
}

/// Decode PNG/JPEG/GIF/BMP bytes into an RGBA icon
pub fn decode_icon(bytes: &[u8]) -> Result<Icon> {
    let image = image::load_from_memory(bytes)?.to_rgba8();
    let (width, height) = image.dimensions();
    Ok(Icon::new(width, height, image.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut out, image::ImageOutputFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let icon = decode_icon(&png_bytes()).unwrap();
        assert_eq!(icon.size(), (3, 2));
        assert_eq!(icon.rgba.len(), 3 * 2 * 4);
        assert_eq!(&icon.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_garbage_is_error() {
        let result = decode_icon(b"definitely not an image");
        assert!(matches!(result, Err(BridgeError::Decode(_))));
    }

    #[test]
    fn test_file_uri() {
        let path = std::env::temp_dir().join(format!("mapbridge-icon-{}.png", std::process::id()));
        std::fs::write(&path, png_bytes()).unwrap();

        let fetcher = HttpIconFetcher::new();
        let icon = fetcher
            .fetch(&format!("file://{}", path.display()))
            .unwrap();
        assert_eq!(icon.size(), (3, 2));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_is_error() {
        let fetcher = HttpIconFetcher::new();
        let result = fetcher.fetch("file:///nonexistent/mapbridge/pin.png");
        assert!(matches!(result, Err(BridgeError::Io(_))));
    }
}
