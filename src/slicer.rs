use std::path::Path;
use std::{error, fmt};

use crate::backend::{CropAndScale, CropError};
use crate::layout::{GlyphCell, SheetLayout};

/// Slices every glyph in `layout` out of the sheet at `source` into `dest`.
///
/// Glyphs are produced in index order, one [`CropAndScale`] call each, writing
/// `{index}.png` into `dest`. Neither path is validated up front. A glyph that fails
/// is recorded in the returned [`SliceReport`] and the remaining glyphs are still
/// attempted.
///
/// # Errors
///
/// Returns [`SliceError::Aborted`] if `backend` reports a [fatal][CropError::is_fatal]
/// error, since every following glyph would fail the same way.
pub fn slice_sheet<B: CropAndScale + ?Sized>(
    source: &Path,
    dest: &Path,
    layout: &SheetLayout,
    backend: &mut B,
) -> Result<SliceReport, SliceError> {
    log::info!(
        "Slicing {} into {} ({}x{} cells, {} per row)",
        source.display(),
        dest.display(),
        layout.cell_width,
        layout.cell_height,
        layout.columns,
    );

    let mut report = SliceReport::default();
    for cell in layout.cells() {
        let rect = layout.rect(&cell);
        let out_path = cell.output_path(dest);

        report.invocations += 1;
        match backend.crop_and_scale(source, rect, layout.output_size(), &out_path) {
            Ok(()) => log::debug!("Wrote {:?} to {}", cell.character, out_path.display()),
            Err(error) if error.is_fatal() => {
                return Err(SliceError::Aborted { cell, source: error });
            }
            Err(error) => {
                let failure = GlyphFailure { cell, error };
                log::warn!("{failure}");
                report.failures.push(failure);
            }
        }
    }

    log::info!(
        "{} of {} glyphs written",
        report.succeeded(),
        report.invocations
    );

    Ok(report)
}

/// Outcome of a [`slice_sheet`] run that went through every glyph.
#[derive(Debug, Default)]
pub struct SliceReport {
    /// Number of glyphs attempted.
    pub invocations: usize,
    /// Glyphs that could not be produced, in index order.
    pub failures: Vec<GlyphFailure>,
}

impl SliceReport {
    /// Returns `true` if every glyph was produced.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of glyphs produced.
    pub fn succeeded(&self) -> usize {
        self.invocations - self.failures.len()
    }
}

/// A glyph that could not be produced.
#[derive(Debug)]
pub struct GlyphFailure {
    /// The glyph's cell.
    pub cell: GlyphCell,
    /// What went wrong.
    pub error: CropError,
}

impl fmt::Display for GlyphFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "glyph {} ({:?}) failed: {}",
            self.cell.index, self.cell.character, self.error
        )
    }
}

/// Errors that stop a [`slice_sheet`] run early.
#[derive(Debug)]
pub enum SliceError {
    /// A glyph failed in a way every following glyph would too.
    Aborted {
        /// The glyph being produced when the run stopped.
        cell: GlyphCell,
        /// The error reported for it.
        source: CropError,
    },
}

impl fmt::Display for SliceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aborted { cell, source } => write!(
                f,
                "aborted at glyph {} ({:?}): {source}",
                cell.index, cell.character
            ),
        }
    }
}

impl error::Error for SliceError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Aborted { source, .. } => Some(source),
        }
    }
}
