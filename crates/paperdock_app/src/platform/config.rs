use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use paperdock_engine::{EngineConfig, PageSize};
use paperdock_logging::dock_info;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "paperdock.ron";
const DEFAULT_OUTPUT_DIR: &str = "output";

/// Resolved application settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// On-disk shape of `paperdock.ron`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    page: Option<PageChoice>,
    raster_scale: Option<f32>,
    jpeg_quality: Option<u8>,
    segmenter: Option<SegmenterFile>,
    pdfium_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
enum PageChoice {
    A4,
    Letter,
    Custom { width: f64, height: f64 },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SegmenterFile {
    program: Option<String>,
    args: Option<Vec<String>>,
    asset_location: Option<String>,
    asset_env: Option<String>,
}

impl ConfigFile {
    fn merge_into(self, config: &mut AppConfig) {
        if let Some(page) = self.page {
            config.engine.page = match page {
                PageChoice::A4 => PageSize::A4,
                PageChoice::Letter => PageSize::LETTER,
                PageChoice::Custom { width, height } => PageSize { width, height },
            };
        }
        if let Some(scale) = self.raster_scale {
            config.engine.raster_scale = scale;
        }
        if let Some(quality) = self.jpeg_quality {
            config.engine.jpeg_quality = quality;
        }
        if let Some(dir) = self.pdfium_dir {
            config.engine.pdfium_dir = Some(dir);
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        if let Some(segmenter) = self.segmenter {
            let target = &mut config.engine.segmenter;
            if let Some(program) = segmenter.program {
                target.program = program;
            }
            if let Some(args) = segmenter.args {
                target.args = args;
            }
            if segmenter.asset_location.is_some() {
                target.asset_location = segmenter.asset_location;
            }
            if let Some(env) = segmenter.asset_env {
                target.asset_env = env;
            }
        }
    }
}

fn parse(text: &str) -> Result<ConfigFile, ron::error::SpannedError> {
    ron::from_str(text)
}

/// Loads `explicit`, or `./paperdock.ron` when it exists, over the defaults.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
            fallback.is_file().then_some(fallback)
        }
    };

    let mut config = AppConfig::default();
    if let Some(path) = path {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("reading configuration {}", path.display()))?;
        let file = parse(&text)
            .with_context(|| format!("parsing configuration {}", path.display()))?;
        file.merge_into(&mut config);
        dock_info!("Loaded configuration from {:?}", path);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use paperdock_engine::PageSize;
    use pretty_assertions::assert_eq;

    use super::{load, parse, AppConfig};

    #[test]
    fn empty_file_keeps_defaults() {
        let mut config = AppConfig::default();
        parse("()").unwrap().merge_into(&mut config);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn fields_override_defaults() {
        let text = r#"#![enable(implicit_some)]
            (
                page: Custom(width: 100.0, height: 150.0),
                raster_scale: 2.0,
                segmenter: (
                    program: "backgroundremover",
                    args: ["-i", "{input}", "-o", "{output}"],
                    asset_location: "/opt/models",
                ),
                output_dir: "exports",
            )
        "#;
        let mut config = AppConfig::default();
        parse(text).unwrap().merge_into(&mut config);

        assert_eq!(
            config.engine.page,
            PageSize {
                width: 100.0,
                height: 150.0,
            }
        );
        assert_eq!(config.engine.raster_scale, 2.0);
        assert_eq!(config.engine.jpeg_quality, 92);
        assert_eq!(config.engine.segmenter.program, "backgroundremover");
        assert_eq!(config.engine.segmenter.args.len(), 4);
        assert_eq!(
            config.engine.segmenter.asset_location.as_deref(),
            Some("/opt/models")
        );
        assert_eq!(config.engine.segmenter.asset_env, "U2NET_HOME");
        assert_eq!(config.output_dir, PathBuf::from("exports"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(parse("(colour: \"red\")").is_err());
    }

    #[test]
    fn explicit_file_is_loaded() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("custom.ron");
        std::fs::write(&path, "(page: Some(Letter))").unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.engine.page, PageSize::LETTER);

        assert!(load(Some(&temp.path().join("missing.ron"))).is_err());
    }
}
