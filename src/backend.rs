//! Ways of cutting a single glyph out of a sheet.
//!
//! [`ConvertTool`] hands the work to ImageMagick's `convert`, one process per glyph.
//! [`InProcess`] does the same with the `image` crate, without leaving the process.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use std::{error, fmt, io};

use crate::layout::{size_geometry, CellRect};

/// Crops a rectangle out of a source image, scales it and writes the result.
pub trait CropAndScale {
    /// Crops `rect` out of the image at `source`, scales it to `out_size`
    /// (`(width, height)`) and writes it to `out_path`.
    ///
    /// # Errors
    ///
    /// Returns a [`CropError`] if the glyph could not be produced. Whether anything
    /// was written to `out_path` in that case is unspecified.
    fn crop_and_scale(
        &mut self,
        source: &Path,
        rect: CellRect,
        out_size: (u32, u32),
        out_path: &Path,
    ) -> Result<(), CropError>;
}

impl<T: CropAndScale + ?Sized> CropAndScale for &mut T {
    fn crop_and_scale(
        &mut self,
        source: &Path,
        rect: CellRect,
        out_size: (u32, u32),
        out_path: &Path,
    ) -> Result<(), CropError> {
        (**self).crop_and_scale(source, rect, out_size, out_path)
    }
}

/// Runs ImageMagick's `convert` (or a compatible program) once per glyph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConvertTool {
    program: OsString,
}

impl ConvertTool {
    /// Uses the `convert` program found on `PATH`.
    pub fn new() -> Self {
        Self::with_program("convert")
    }

    /// Uses `program` instead of `convert`, e.g. `magick` on ImageMagick 7 installs.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Builds `convert <source> -crop WxH+X+Y -scale WxH <out_path>`.
    pub fn command(
        &self,
        source: &Path,
        rect: CellRect,
        out_size: (u32, u32),
        out_path: &Path,
    ) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(source);
        cmd.arg("-crop").arg(rect.to_string());
        cmd.arg("-scale").arg(size_geometry(out_size));
        cmd.arg(out_path);
        cmd
    }
}

impl Default for ConvertTool {
    fn default() -> Self {
        Self::new()
    }
}

impl CropAndScale for ConvertTool {
    fn crop_and_scale(
        &mut self,
        source: &Path,
        rect: CellRect,
        out_size: (u32, u32),
        out_path: &Path,
    ) -> Result<(), CropError> {
        let mut cmd = self.command(source, rect, out_size, out_path);
        log::debug!("Running command: {cmd:?}");

        let status = cmd.status()?;
        if !status.success() {
            return Err(CropError::Failed {
                code: status.code(),
            });
        }

        Ok(())
    }
}

#[cfg(feature = "in-process")]
pub use in_process::InProcess;

#[cfg(feature = "in-process")]
mod in_process {
    use std::path::{Path, PathBuf};

    use image::imageops::FilterType;
    use image::{DynamicImage, GenericImageView, ImageFormat};

    use super::{CropAndScale, CropError};
    use crate::layout::CellRect;

    /// Crops and scales with the `image` crate.
    ///
    /// The most recently used source image stays decoded between calls, so slicing a
    /// whole sheet decodes it once.
    #[cfg_attr(docs_rs, doc(cfg(feature = "in-process")))]
    pub struct InProcess {
        filter: FilterType,
        sheet: Option<(PathBuf, DynamicImage)>,
    }

    impl InProcess {
        /// Scales with a triangle (bilinear) filter.
        pub fn new() -> Self {
            Self::with_filter(FilterType::Triangle)
        }

        /// Scales with `filter`.
        pub fn with_filter(filter: FilterType) -> Self {
            Self {
                filter,
                sheet: None,
            }
        }

        fn sheet(&mut self, source: &Path) -> Result<&DynamicImage, CropError> {
            let cached = matches!(&self.sheet, Some((path, _)) if path == source);
            if !cached {
                log::debug!("Decoding sheet {}", source.display());
                let image = image::open(source)?;
                self.sheet = Some((source.to_path_buf(), image));
            }

            match &self.sheet {
                Some((_, image)) => Ok(image),
                None => unreachable!("sheet was just decoded"),
            }
        }
    }

    impl Default for InProcess {
        fn default() -> Self {
            Self::new()
        }
    }

    impl std::fmt::Debug for InProcess {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("InProcess")
                .field("filter", &self.filter)
                .field("sheet", &self.sheet.as_ref().map(|(path, _)| path))
                .finish()
        }
    }

    impl CropAndScale for InProcess {
        fn crop_and_scale(
            &mut self,
            source: &Path,
            rect: CellRect,
            (out_width, out_height): (u32, u32),
            out_path: &Path,
        ) -> Result<(), CropError> {
            let filter = self.filter;
            let sheet = self.sheet(source)?;
            let (width, height) = sheet.dimensions();

            let fits = |start: u32, len: u32, max: u32| {
                start.checked_add(len).is_some_and(|end| end <= max)
            };
            if !fits(rect.x, rect.width, width) || !fits(rect.y, rect.height, height) {
                return Err(CropError::OutOfBounds {
                    rect,
                    width,
                    height,
                });
            }

            let glyph = sheet
                .crop_imm(rect.x, rect.y, rect.width, rect.height)
                .resize_exact(out_width, out_height, filter);
            glyph.save_with_format(out_path, ImageFormat::Png)?;

            Ok(())
        }
    }
}

/// Various errors that can occur while producing a single glyph.
#[derive(Debug)]
pub enum CropError {
    /// The external tool could not be launched.
    Launch(io::Error),
    /// The external tool exited unsuccessfully.
    Failed {
        /// The exit code of the tool, `None` if it was terminated by a signal.
        code: Option<i32>,
    },
    /// The cell does not lie entirely within the source image.
    OutOfBounds {
        /// The requested cell.
        rect: CellRect,
        /// Width of the source image.
        width: u32,
        /// Height of the source image.
        height: u32,
    },
    /// The source image could not be decoded, or the glyph could not be encoded.
    #[cfg(feature = "in-process")]
    Image(image::ImageError),
}

impl CropError {
    /// Returns `true` if every following glyph would fail the same way, i.e. the
    /// external tool does not exist.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Launch(error) if error.kind() == io::ErrorKind::NotFound)
    }
}

impl From<io::Error> for CropError {
    fn from(value: io::Error) -> Self {
        Self::Launch(value)
    }
}

#[cfg(feature = "in-process")]
impl From<image::ImageError> for CropError {
    fn from(value: image::ImageError) -> Self {
        Self::Image(value)
    }
}

impl fmt::Display for CropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Launch(error) => write!(f, "error launching command: {error}"),
            Self::Failed { code: Some(code) } => {
                write!(f, "command failed with exit status {code}")
            }
            Self::Failed { code: None } => write!(f, "command terminated by signal"),
            Self::OutOfBounds {
                rect,
                width,
                height,
            } => write!(f, "cell {rect} lies outside the {width}x{height} source image"),
            #[cfg(feature = "in-process")]
            Self::Image(error) => write!(f, "image error: {error}"),
        }
    }
}

impl error::Error for CropError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Launch(error) => Some(error),
            #[cfg(feature = "in-process")]
            Self::Image(error) => Some(error),
            _ => None,
        }
    }
}
