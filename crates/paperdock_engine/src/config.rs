use std::path::PathBuf;

use thiserror::Error;

/// Page dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width: 210.0,
        height: 297.0,
    };
    pub const LETTER: PageSize = PageSize {
        width: 215.9,
        height: 279.4,
    };

    const POINTS_PER_MM: f64 = 72.0 / 25.4;

    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }

    pub fn mm_to_points(value: f64) -> f64 {
        value * Self::POINTS_PER_MM
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// How the external segmentation program is located and invoked.
///
/// `{input}` and `{output}` in `args` are replaced with temp file paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmenterSettings {
    pub program: String,
    pub args: Vec<String>,
    /// Where the program should look for its model assets, if not its default.
    pub asset_location: Option<String>,
    /// Environment variable that carries `asset_location` to the program.
    pub asset_env: String,
}

impl Default for SegmenterSettings {
    fn default() -> Self {
        Self {
            program: "rembg".to_string(),
            args: vec!["i".to_string(), "{input}".to_string(), "{output}".to_string()],
            asset_location: None,
            asset_env: "U2NET_HOME".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub page: PageSize,
    /// Upscale factor applied to each PDF page when rasterizing.
    pub raster_scale: f32,
    pub jpeg_quality: u8,
    pub segmenter: SegmenterSettings,
    /// Directory holding the pdfium shared library, tried before the system one.
    pub pdfium_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page: PageSize::A4,
            raster_scale: 1.5,
            jpeg_quality: 92,
            segmenter: SegmenterSettings::default(),
            pdfium_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("page size must be positive, got {width}x{height} mm")]
    InvalidPageSize { width: f64, height: f64 },
    #[error("raster scale must be positive and finite, got {0}")]
    InvalidScale(f32),
    #[error("jpeg quality must be within 1..=100, got {0}")]
    InvalidQuality(u8),
    #[error("segmentation program must not be empty")]
    EmptyProgram,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let PageSize { width, height } = self.page;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidPageSize { width, height });
        }
        if !(self.raster_scale.is_finite() && self.raster_scale > 0.0) {
            return Err(ConfigError::InvalidScale(self.raster_scale));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::InvalidQuality(self.jpeg_quality));
        }
        if self.segmenter.program.trim().is_empty() {
            return Err(ConfigError::EmptyProgram);
        }
        Ok(())
    }
}
