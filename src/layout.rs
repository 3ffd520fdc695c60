use std::fmt;
use std::path::{Path, PathBuf};

/// Every printable ASCII character, space through tilde, in the order the glyphs
/// appear on a sheet.
pub const CHARSET: &str = " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

/// Number of glyphs on a sheet, one per character in [`CHARSET`].
pub const GLYPH_COUNT: usize = 95;

const FIRST_GLYPH: char = ' ';
const LAST_GLYPH: char = '~';

/// Grid geometry of a glyph sheet and the size glyphs are scaled to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serde-deserialize", derive(serde::Deserialize))]
pub struct SheetLayout {
    /// Number of cells per row before wrapping to the next row. Must not be zero.
    pub columns: u32,
    /// Width of one cell on the source sheet, in pixels.
    pub cell_width: u32,
    /// Height of one cell on the source sheet, in pixels.
    pub cell_height: u32,
    /// Width of a sliced glyph image, in pixels.
    pub output_width: u32,
    /// Height of a sliced glyph image, in pixels.
    pub output_height: u32,
}

impl SheetLayout {
    /// The text atlas layout: 15 columns of 34x72 cells, each scaled to 32x32.
    pub const GIZMO_TEXT_ATLAS: Self = Self {
        columns: 15,
        cell_width: 34,
        cell_height: 72,
        output_width: 32,
        output_height: 32,
    };

    /// Iterates the cells of every glyph in [`CHARSET`] order.
    pub fn cells(&self) -> Cells<'_> {
        Cells {
            layout: self,
            chars: CHARSET.chars(),
            index: 0,
            column: 0,
            row: 0,
        }
    }

    /// Returns the cell of the glyph at `index`, or `None` past the end of the set.
    pub fn cell(&self, index: usize) -> Option<GlyphCell> {
        let character = char::from(*CHARSET.as_bytes().get(index)?);
        let columns = self.columns as usize;

        Some(GlyphCell {
            index,
            character,
            column: (index % columns) as u32,
            row: (index / columns) as u32,
        })
    }

    /// Returns the source rectangle holding `cell`.
    pub fn rect(&self, cell: &GlyphCell) -> CellRect {
        CellRect {
            x: cell.column * self.cell_width,
            y: cell.row * self.cell_height,
            width: self.cell_width,
            height: self.cell_height,
        }
    }

    /// Number of rows the full glyph set spans.
    pub fn rows(&self) -> u32 {
        GLYPH_COUNT.div_ceil(self.columns as usize) as u32
    }

    /// Smallest source sheet, `(width, height)`, that holds every cell.
    pub fn sheet_size(&self) -> (u32, u32) {
        (self.columns * self.cell_width, self.rows() * self.cell_height)
    }

    /// Size of a sliced glyph image as `(width, height)`.
    pub fn output_size(&self) -> (u32, u32) {
        (self.output_width, self.output_height)
    }
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::GIZMO_TEXT_ATLAS
    }
}

/// One glyph's position on the sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serde-deserialize", derive(serde::Deserialize))]
pub struct GlyphCell {
    /// Position in [`CHARSET`], which also names the output file.
    pub index: usize,
    /// The character drawn in this cell.
    pub character: char,
    /// Zero-based column on the sheet.
    pub column: u32,
    /// Zero-based row on the sheet.
    pub row: u32,
}

impl GlyphCell {
    /// Name of the sliced image for this glyph, `{index}.png`.
    pub fn file_name(&self) -> String {
        file_name(self.index)
    }

    /// Path of the sliced image for this glyph inside `dest`.
    pub fn output_path(&self, dest: &Path) -> PathBuf {
        dest.join(self.file_name())
    }
}

/// A rectangle on the source sheet, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(serde::Serialize))]
#[cfg_attr(feature = "serde-deserialize", derive(serde::Deserialize))]
pub struct CellRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width, starting at `x`.
    pub width: u32,
    /// Height, starting at `y`.
    pub height: u32,
}

/// Formats as an ImageMagick crop geometry, `WxH+X+Y`.
impl fmt::Display for CellRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Formats `(width, height)` as an ImageMagick size geometry, `WxH`.
pub fn size_geometry((width, height): (u32, u32)) -> String {
    format!("{width}x{height}")
}

/// Name of the sliced image for the glyph at `index`.
pub fn file_name(index: usize) -> String {
    format!("{index}.png")
}

/// Index of the glyph for `c`, or `None` if `c` is not a printable ASCII character.
pub fn glyph_index(c: char) -> Option<usize> {
    if (FIRST_GLYPH..=LAST_GLYPH).contains(&c) {
        Some(c as usize - FIRST_GLYPH as usize)
    } else {
        None
    }
}

/// Name of the sliced image for `c`, or `None` if the sheet has no glyph for it.
pub fn glyph_file_name(c: char) -> Option<String> {
    glyph_index(c).map(file_name)
}

/// Iterator over the cells of a [`SheetLayout`], walking the grid row by row.
#[derive(Clone, Debug)]
pub struct Cells<'layout> {
    layout: &'layout SheetLayout,
    chars: std::str::Chars<'static>,
    index: usize,
    column: u32,
    row: u32,
}

impl Iterator for Cells<'_> {
    type Item = GlyphCell;

    fn next(&mut self) -> Option<Self::Item> {
        let character = self.chars.next()?;

        if self.column >= self.layout.columns {
            self.column = 0;
            self.row += 1;
        }

        let cell = GlyphCell {
            index: self.index,
            character,
            column: self.column,
            row: self.row,
        };

        self.column += 1;
        self.index += 1;

        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chars.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_is_printable_ascii_in_order() {
        assert_eq!(CHARSET.len(), GLYPH_COUNT);
        let expected: String = (' '..='~').collect();
        assert_eq!(CHARSET, expected);
    }

    #[test]
    fn walk_matches_modular_positions() {
        let layout = SheetLayout::GIZMO_TEXT_ATLAS;
        let cells: Vec<_> = layout.cells().collect();
        assert_eq!(cells.len(), GLYPH_COUNT);

        for (i, cell) in cells.iter().enumerate() {
            assert_eq!(cell.index, i);
            assert_eq!(cell.column, (i % 15) as u32);
            assert_eq!(cell.row, (i / 15) as u32);
            assert_eq!(Some(*cell), layout.cell(i));
        }
    }

    #[test]
    fn row_wraps_after_fifteen_columns() {
        let layout = SheetLayout::default();

        let last_in_row = layout.cell(14).unwrap();
        assert_eq!((last_in_row.column, last_in_row.row), (14, 0));

        let first_in_next = layout.cell(15).unwrap();
        assert_eq!((first_in_next.column, first_in_next.row), (0, 1));

        let tilde = layout.cells().last().unwrap();
        assert_eq!(tilde.character, '~');
        assert_eq!((tilde.index, tilde.column, tilde.row), (94, 4, 6));
    }

    #[test]
    fn rects_are_cell_sized_at_grid_origin() {
        let layout = SheetLayout::GIZMO_TEXT_ATLAS;
        for cell in layout.cells() {
            let rect = layout.rect(&cell);
            assert_eq!(rect.x, cell.column * 34);
            assert_eq!(rect.y, cell.row * 72);
            assert_eq!((rect.width, rect.height), (34, 72));
        }

        let a = layout.cell(glyph_index('A').unwrap()).unwrap();
        assert_eq!(layout.rect(&a).to_string(), "34x72+102+144");
    }

    #[test]
    fn sheet_spans_seven_rows() {
        let layout = SheetLayout::GIZMO_TEXT_ATLAS;
        assert_eq!(layout.rows(), 7);
        assert_eq!(layout.sheet_size(), (510, 504));
        assert_eq!(size_geometry(layout.output_size()), "32x32");
    }

    #[test]
    fn out_of_range_cell_is_none() {
        assert_eq!(SheetLayout::default().cell(GLYPH_COUNT), None);
    }

    #[test]
    fn output_names_are_unique_indices() {
        let names: std::collections::HashSet<_> = SheetLayout::default()
            .cells()
            .map(|cell| cell.file_name())
            .collect();
        assert_eq!(names.len(), GLYPH_COUNT);
        assert!(names.contains("0.png"));
        assert!(names.contains("94.png"));

        let cell = SheetLayout::default().cell(7).unwrap();
        assert_eq!(cell.output_path(Path::new("out")), Path::new("out").join("7.png"));
    }

    #[test]
    fn lookup_by_character() {
        assert_eq!(glyph_index(' '), Some(0));
        assert_eq!(glyph_index('0'), Some(16));
        assert_eq!(glyph_index('~'), Some(94));
        assert_eq!(glyph_index('\n'), None);
        assert_eq!(glyph_index('\u{7f}'), None);
        assert_eq!(glyph_index('é'), None);

        assert_eq!(glyph_file_name('!').as_deref(), Some("1.png"));
        assert_eq!(glyph_file_name('\t'), None);

        for (i, c) in CHARSET.chars().enumerate() {
            assert_eq!(glyph_index(c), Some(i));
        }
    }

    #[cfg(feature = "serde-serialize")]
    #[test]
    fn cells_serialize_as_json() {
        let cell = SheetLayout::default().cell(33).unwrap();
        assert_eq!(
            serde_json::to_string(&cell).unwrap(),
            r#"{"index":33,"character":"A","column":3,"row":2}"#
        );

        let rect = SheetLayout::default().rect(&cell);
        assert_eq!(
            serde_json::to_string(&rect).unwrap(),
            r#"{"x":102,"y":144,"width":34,"height":72}"#
        );
    }
}
