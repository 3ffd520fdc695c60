//! Slices a bitmap font sheet into one image per printable ASCII glyph.
//!
//! A sheet is a grid of fixed-size cells holding the characters space through tilde
//! in ASCII order, wrapping after a fixed number of columns. Each cell is cropped out
//! and scaled down to its own `{index}.png`, where `index` is the character's
//! position in [`CHARSET`].
//!
//! # Usage
//! ## Looking up glyphs
//! ```
//! use glyph_slicer::{glyph_file_name, glyph_index, SheetLayout};
//!
//! let layout = SheetLayout::GIZMO_TEXT_ATLAS;
//! let cell = layout.cell(glyph_index('A').unwrap()).unwrap();
//! assert_eq!((cell.column, cell.row), (3, 2));
//! assert_eq!(layout.rect(&cell).to_string(), "34x72+102+144");
//!
//! assert_eq!(glyph_file_name('A').as_deref(), Some("33.png"));
//! assert_eq!(glyph_file_name('\n'), None);
//! ```
//!
//! ## Slicing a sheet
//! ```no_run
//! use std::path::Path;
//! use glyph_slicer::{slice_sheet, ConvertTool, SheetLayout};
//!
//! let report = slice_sheet(
//!     Path::new("TextAtlas.png"),
//!     Path::new("Textures"),
//!     &SheetLayout::GIZMO_TEXT_ATLAS,
//!     &mut ConvertTool::new(),
//! )?;
//! for failure in &report.failures {
//!     eprintln!("{failure}");
//! }
//! # Ok::<(), glyph_slicer::SliceError>(())
//! ```

#![cfg_attr(docs_rs, feature(doc_cfg))]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]

pub mod backend;
mod layout;
mod slicer;

#[cfg(feature = "in-process")]
pub use backend::InProcess;
pub use backend::{ConvertTool, CropAndScale, CropError};
pub use layout::{
    file_name, glyph_file_name, glyph_index, size_geometry, CellRect, Cells, GlyphCell,
    SheetLayout, CHARSET, GLYPH_COUNT,
};
pub use slicer::{slice_sheet, GlyphFailure, SliceError, SliceReport};

#[cfg(feature = "bin")]
mod cli;

#[cfg(feature = "bin")]
pub use cli::{sheet_to_glyphs, Args};
