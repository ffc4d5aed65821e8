//! Rasterization through the Graphviz `dot` program.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result, ValidationError};

/// Image formats the graphs can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    Svg,
    #[default]
    Png,
    Tif,
    Gif,
    Jpg,
}

impl ImageFormat {
    /// All supported formats.
    pub const ALL: [ImageFormat; 5] = [
        ImageFormat::Svg,
        ImageFormat::Png,
        ImageFormat::Tif,
        ImageFormat::Gif,
        ImageFormat::Jpg,
    ];

    /// The format name, also used as the `dot -T` argument and file extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
            ImageFormat::Tif => "tif",
            ImageFormat::Gif => "gif",
            ImageFormat::Jpg => "jpg",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ImageFormat::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::UnknownImageFormat(s.to_string()))
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Appends the format extension to a path: `report/roles` -> `report/roles.png`.
pub fn image_path(output: &Path, format: ImageFormat) -> PathBuf {
    let mut path = output.as_os_str().to_owned();
    path.push(".");
    path.push(format.as_str());
    PathBuf::from(path)
}

/// Turns a DOT description into an image file.
pub trait Rasterizer {
    /// Lays out `dot` and writes the image to `output` plus the format
    /// extension. Returns the path of the image.
    fn rasterize(&self, dot: &str, format: ImageFormat, output: &Path) -> Result<PathBuf>;
}

/// Runs the Graphviz `dot` program.
///
/// The DOT source is saved at `output` and the image written beside it.
#[derive(Debug, Clone)]
pub struct Graphviz {
    program: PathBuf,
}

impl Default for Graphviz {
    fn default() -> Self {
        Self::new("dot")
    }
}

impl Graphviz {
    /// Uses `program` instead of `dot` from `PATH`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Rasterizer for Graphviz {
    fn rasterize(&self, dot: &str, format: ImageFormat, output: &Path) -> Result<PathBuf> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Render(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
        fs::write(output, dot)
            .map_err(|e| Error::Render(format!("cannot write {}: {}", output.display(), e)))?;

        let image = image_path(output, format);
        debug!(
            "Running {} -T{} -o {}",
            self.program.display(),
            format,
            image.display()
        );

        let result = Command::new(&self.program)
            .arg(format!("-T{}", format))
            .arg("-o")
            .arg(&image)
            .arg(output)
            .output()
            .map_err(|e| {
                Error::Render(format!("failed to run {}: {}", self.program.display(), e))
            })?;

        if !result.status.success() {
            return Err(Error::Render(format!(
                "{} exited with {}: {}",
                self.program.display(),
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            )));
        }

        Ok(image)
    }
}
