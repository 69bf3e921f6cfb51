use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use paperdock_core::Slot;
use paperdock_engine::PageSize;
use paperdock_logging::LogDestination;

use super::config::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "paperdock",
    version,
    about = "Combine images into a PDF, strip image backgrounds, or split a PDF into page images",
    arg_required_else_help = true
)]
pub struct Cli {
    /// RON configuration file. `./paperdock.ron` is used when present.
    #[arg(long, value_name = "FILE", env = "PAPERDOCK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory that receives produced files.
    #[arg(short, long, value_name = "DIR", env = "PAPERDOCK_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Where log lines go: terminal, file or both.
    #[arg(long, value_name = "DEST", default_value = "terminal")]
    pub log: LogDestination,

    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: LevelFilter,

    /// Page size used when combining images.
    #[arg(long, value_enum)]
    pub page: Option<PageArg>,

    /// Upscale factor applied to PDF pages when rasterizing.
    #[arg(long, value_name = "FACTOR")]
    pub scale: Option<f32>,

    /// Background segmentation program.
    #[arg(long, value_name = "PROGRAM", env = "PAPERDOCK_SEGMENTER")]
    pub segmenter: Option<String>,

    /// Directory the segmentation program loads its models from.
    #[arg(long, value_name = "DIR", env = "PAPERDOCK_MODELS")]
    pub models: Option<String>,

    /// Directory containing the pdfium shared library.
    #[arg(long, value_name = "DIR", env = "PDFIUM_DIR")]
    pub pdfium_dir: Option<PathBuf>,

    /// Print the final page as JSON.
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Combine images into one PDF, one image per page.
    ImagesToPdf {
        #[arg(required = true, value_name = "IMAGE")]
        files: Vec<PathBuf>,
    },
    /// Remove the background of one image.
    RemoveBg {
        #[arg(value_name = "IMAGE")]
        file: PathBuf,
    },
    /// Render every page of a PDF to PNG.
    PdfToImages {
        #[arg(value_name = "PDF")]
        file: PathBuf,
    },
    /// Show which tools are available.
    Status,
}

impl Command {
    /// Target slot and input paths, `None` for `status`.
    pub fn conversion(&self) -> Option<(Slot, Vec<PathBuf>)> {
        match self {
            Command::ImagesToPdf { files } => Some((Slot::ImagesToPdf, files.clone())),
            Command::RemoveBg { file } => Some((Slot::RemoveBackground, vec![file.clone()])),
            Command::PdfToImages { file } => Some((Slot::PdfToImages, vec![file.clone()])),
            Command::Status => None,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageArg {
    A4,
    Letter,
}

impl From<PageArg> for PageSize {
    fn from(page: PageArg) -> Self {
        match page {
            PageArg::A4 => PageSize::A4,
            PageArg::Letter => PageSize::LETTER,
        }
    }
}

impl Cli {
    /// Flags win over the configuration file.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(page) = self.page {
            config.engine.page = page.into();
        }
        if let Some(scale) = self.scale {
            config.engine.raster_scale = scale;
        }
        if let Some(program) = &self.segmenter {
            config.engine.segmenter.program = program.clone();
        }
        if let Some(models) = &self.models {
            config.engine.segmenter.asset_location = Some(models.clone());
        }
        if let Some(dir) = &self.pdfium_dir {
            config.engine.pdfium_dir = Some(dir.clone());
        }
    }
}
