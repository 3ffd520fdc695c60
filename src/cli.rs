use std::path::PathBuf;

use clap::Parser;

use crate::{slice_sheet, CropAndScale, SheetLayout, SliceReport};

/// Slices a bitmap font sheet into one 32x32 image per printable ASCII character
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Source image to crop from
    pub source: PathBuf,
    /// Directory to write the sliced glyphs into, as 0.png through 94.png
    pub dest: PathBuf,
}

/// Slices the sheet named by `args` with the fixed text atlas layout.
///
/// # Errors
///
/// Fails if the run was aborted, or if any glyph could not be produced.
pub fn sheet_to_glyphs<B: CropAndScale + ?Sized>(
    args: &Args,
    backend: &mut B,
) -> anyhow::Result<SliceReport> {
    let report = slice_sheet(
        &args.source,
        &args.dest,
        &SheetLayout::GIZMO_TEXT_ATLAS,
        backend,
    )?;

    if !report.is_success() {
        let indices: Vec<String> = report
            .failures
            .iter()
            .map(|failure| failure.cell.index.to_string())
            .collect();
        anyhow::bail!(
            "{} of {} glyphs failed: {}",
            report.failures.len(),
            report.invocations,
            indices.join(", ")
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::{CellRect, CropError};

    struct FailAt(&'static [usize]);

    impl CropAndScale for FailAt {
        fn crop_and_scale(
            &mut self,
            _source: &Path,
            _rect: CellRect,
            _out_size: (u32, u32),
            out_path: &Path,
        ) -> Result<(), CropError> {
            let index: usize = out_path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse().ok())
                .unwrap();

            if self.0.contains(&index) {
                Err(CropError::Failed { code: Some(1) })
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn parses_two_positionals() {
        let args = Args::try_parse_from(["glyph-slicer", "sheet.png", "out"]).unwrap();
        assert_eq!(args.source, Path::new("sheet.png"));
        assert_eq!(args.dest, Path::new("out"));
    }

    #[test]
    fn rejects_missing_or_extra_arguments() {
        assert!(Args::try_parse_from(["glyph-slicer", "sheet.png"]).is_err());
        assert!(Args::try_parse_from(["glyph-slicer", "a", "b", "c"]).is_err());
        assert!(Args::try_parse_from(["glyph-slicer", "--columns", "4", "a", "b"]).is_err());
    }

    #[test]
    fn failed_glyphs_fail_the_run() {
        let args = Args::try_parse_from(["glyph-slicer", "sheet.png", "out"]).unwrap();
        let error = sheet_to_glyphs(&args, &mut FailAt(&[0, 40, 80])).unwrap_err();
        assert_eq!(error.to_string(), "3 of 95 glyphs failed: 0, 40, 80");
    }

    #[test]
    fn clean_run_succeeds() {
        let args = Args::try_parse_from(["glyph-slicer", "sheet.png", "out"]).unwrap();
        let report = sheet_to_glyphs(&args, &mut FailAt(&[])).unwrap();
        assert_eq!(report.succeeded(), 95);
    }
}
