use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use bytes::Bytes;
use image::ImageFormat;
use paperdock_core::StagedFile;
use paperdock_logging::{dock_debug, dock_warn};
use tokio::process::Command;

use crate::{decode_image, CapabilityError, SegmenterSettings};

/// Progress callback, called with a fraction in `0.0..=1.0`.
pub type ProgressFn<'a> = dyn Fn(f32) + Send + Sync + 'a;

pub struct SegmentationConfig<'a> {
    /// Overrides where the capability loads its model assets from.
    pub asset_location: Option<&'a str>,
    pub on_progress: &'a ProgressFn<'a>,
}

/// Background segmentation: one image in, one PNG with transparent
/// background out.
#[async_trait::async_trait]
pub trait Segmenter: Send + Sync {
    /// Whether the capability can run at all on this machine.
    fn probe(&self) -> bool;

    async fn remove_background(
        &self,
        file: &StagedFile,
        config: SegmentationConfig<'_>,
    ) -> Result<Bytes, CapabilityError>;
}

/// Runs an external segmentation program on temp files.
#[derive(Debug, Clone)]
pub struct CommandSegmenter {
    settings: SegmenterSettings,
}

impl CommandSegmenter {
    pub fn new(settings: SegmenterSettings) -> Self {
        Self { settings }
    }

    fn resolve_program(&self) -> Result<PathBuf, CapabilityError> {
        which::which(&self.settings.program)
            .map_err(|_| CapabilityError::Unavailable(self.settings.program.clone()))
    }

    fn build_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.settings
            .args
            .iter()
            .map(|arg| arg.replace("{input}", &input).replace("{output}", &output))
            .collect()
    }
}

#[async_trait::async_trait]
impl Segmenter for CommandSegmenter {
    fn probe(&self) -> bool {
        match self.resolve_program() {
            Ok(path) => {
                dock_debug!("segmentation program found at {:?}", path);
                true
            }
            Err(err) => {
                dock_warn!("segmentation capability unavailable: {}", err);
                false
            }
        }
    }

    async fn remove_background(
        &self,
        file: &StagedFile,
        config: SegmentationConfig<'_>,
    ) -> Result<Bytes, CapabilityError> {
        let program = self.resolve_program()?;
        (config.on_progress)(0.0);

        let workdir = tempfile::tempdir()?;
        let extension = Path::new(&file.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("png");
        let input = workdir.path().join(format!("input.{extension}"));
        let output = workdir.path().join("output.png");
        tokio::fs::write(&input, &file.bytes).await?;

        let mut command = Command::new(&program);
        command
            .args(self.build_args(&input, &output))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(location) = config.asset_location {
            command.env(&self.settings.asset_env, location);
        }

        dock_debug!("running {:?} on '{}'", program, file.name);
        let finished = command.output().await?;
        if !finished.status.success() {
            let stderr = String::from_utf8_lossy(&finished.stderr);
            return Err(CapabilityError::Segmentation(format!(
                "{} exited with {}: {}",
                self.settings.program,
                finished.status,
                stderr.trim()
            )));
        }

        let produced = tokio::fs::read(&output).await.map_err(|err| {
            CapabilityError::Segmentation(format!("no output image produced: {err}"))
        })?;
        let png = ensure_png(&file.name, produced)?;
        (config.on_progress)(1.0);
        Ok(png)
    }
}

/// Passes PNG data through untouched and re-encodes anything else.
fn ensure_png(name: &str, data: Vec<u8>) -> Result<Bytes, CapabilityError> {
    if matches!(image::guess_format(&data), Ok(ImageFormat::Png)) {
        return Ok(Bytes::from(data));
    }
    let image = decode_image(name, &data)?;
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|err| CapabilityError::Encode(err.to_string()))?;
    Ok(Bytes::from(png))
}
