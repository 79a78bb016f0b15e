use crate::Result;

/// A decoded marker icon in straight RGBA8
#[derive(Clone, PartialEq, Eq)]
pub struct Icon {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Icon {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl std::fmt::Debug for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Icon")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// Retrieves and decodes an icon. Implementations block; failures come back
/// as errors, never panics.
pub trait IconFetcher: Send + Sync {
    fn fetch(&self, uri: &str) -> Result<Icon>;
}

impl<F> IconFetcher for F
where
    F: Fn(&str) -> Result<Icon> + Send + Sync,
{
    fn fetch(&self, uri: &str) -> Result<Icon> {
        self(uri)
    }
}
