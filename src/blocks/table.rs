use super::{Block, Drawable};
use crate::canvas::Canvas;
use crate::error::{Error, Result};
use crate::fonts::FontMetrics;
use crate::style::{colours, Colour, HorizontalAlignment, Rect, VerticalAlignment};

const RATIO_TOLERANCE: f32 = 1e-3;
const DEFAULT_PADDING: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CellBorder {
    #[default]
    None,
    Box {
        width: f32,
        colour: Colour,
    },
}

/// One grid cell: a block plus the decoration drawn behind it.
#[derive(Debug, Clone)]
pub struct Cell {
    content: Block,
    border: CellBorder,
    background: Option<Colour>,
    horizontal: HorizontalAlignment,
    vertical: VerticalAlignment,
    padding: f32,
}

impl Cell {
    pub fn new<B: Into<Block>>(content: B) -> Cell {
        Cell {
            content: content.into(),
            border: CellBorder::None,
            background: None,
            horizontal: HorizontalAlignment::Left,
            vertical: VerticalAlignment::Top,
            padding: DEFAULT_PADDING,
        }
    }

    /// A black box border `width` points wide.
    pub fn with_border(self, width: f32) -> Cell {
        self.with_border_style(CellBorder::Box {
            width,
            colour: colours::BLACK,
        })
    }

    pub fn with_border_style(self, border: CellBorder) -> Cell {
        Cell { border, ..self }
    }

    pub fn with_background(self, colour: Colour) -> Cell {
        Cell {
            background: Some(colour),
            ..self
        }
    }

    pub fn with_horizontal_alignment(self, horizontal: HorizontalAlignment) -> Cell {
        Cell { horizontal, ..self }
    }

    pub fn with_vertical_alignment(self, vertical: VerticalAlignment) -> Cell {
        Cell { vertical, ..self }
    }

    /// Space kept clear on the left and right of the content.
    pub fn with_padding(self, padding: f32) -> Cell {
        Cell { padding, ..self }
    }

    pub fn content(&self) -> &Block {
        &self.content
    }

    fn inner_width(&self, cell_width: f32) -> f32 {
        (cell_width - 2.0 * self.padding).max(0.0)
    }

    fn height(&self, cell_width: f32, fonts: &dyn FontMetrics) -> Result<f32> {
        self.content
            .outer_height(self.inner_width(cell_width), fonts)
    }

    fn paint(
        &self,
        canvas: &mut Canvas,
        rect: Rect,
        fonts: &dyn FontMetrics,
    ) -> Result<()> {
        if let Some(colour) = self.background {
            canvas.fill_rect(rect, colour);
        }
        if let CellBorder::Box { width, colour } = self.border {
            canvas.stroke_rect(rect, colour, width);
        }

        let available = self.inner_width(rect.width);
        let used = self.content.natural_width(available, fonts)?.min(available);
        let height = self.content.outer_height(available, fonts)?;

        let dx = match self.horizontal {
            HorizontalAlignment::Left => 0.0,
            HorizontalAlignment::Centre => (available - used) / 2.0,
            HorizontalAlignment::Right => available - used,
        };
        let dy = match self.vertical {
            VerticalAlignment::Top => 0.0,
            VerticalAlignment::Middle => (rect.height - height) / 2.0,
            VerticalAlignment::Bottom => rect.height - height,
        };

        // aligned content is drawn at its natural width so it wraps the same way
        let width = match self.horizontal {
            HorizontalAlignment::Left => available,
            _ => used,
        };
        self.content.draw(
            canvas,
            rect.x + self.padding + dx,
            rect.y + dy.max(0.0),
            width,
            fonts,
        )
    }
}

/// A fixed-column grid filled row-major.
///
/// A table is laid out as a single unit and never split across pages. If the
/// last row is short, the missing cells are left as blank space.
#[derive(Debug, Clone)]
pub struct Table {
    columns: usize,
    ratios: Option<Vec<f32>>,
    cells: Vec<Cell>,
}

impl Table {
    pub fn new(columns: usize) -> Result<Table> {
        if columns == 0 {
            return Err(Error::LayoutConstraint(
                "a table needs at least one column".to_string(),
            ));
        }
        Ok(Table {
            columns,
            ratios: None,
            cells: Vec::new(),
        })
    }

    pub fn with_column_widths(columns: usize, ratios: &[f32]) -> Result<Table> {
        let mut table = Table::new(columns)?;
        table.set_column_widths(ratios)?;
        Ok(table)
    }

    /// Set each column's share of the table width. The table is left untouched
    /// if the ratios don't match the column count or don't sum to 1.
    pub fn set_column_widths(&mut self, ratios: &[f32]) -> Result<()> {
        if ratios.len() != self.columns {
            return Err(Error::LayoutConstraint(format!(
                "{} column widths given for {} columns",
                ratios.len(),
                self.columns
            )));
        }
        if let Some(bad) = ratios.iter().find(|r| !r.is_finite() || **r < 0.0) {
            return Err(Error::LayoutConstraint(format!(
                "column width ratio {bad} is not a non-negative number"
            )));
        }
        let sum: f32 = ratios.iter().sum();
        if (sum - 1.0).abs() > RATIO_TOLERANCE {
            return Err(Error::LayoutConstraint(format!(
                "column width ratios sum to {sum}, expected 1.0"
            )));
        }
        self.ratios = Some(ratios.to_vec());
        Ok(())
    }

    pub fn add_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    pub fn with_cell(mut self, cell: Cell) -> Table {
        self.add_cell(cell);
        self
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.columns)
    }

    /// Effective width of each column when the table is `width` points wide.
    pub fn column_widths(&self, width: f32) -> Vec<f32> {
        match &self.ratios {
            Some(ratios) => ratios.iter().map(|r| r * width).collect(),
            None => vec![width / self.columns as f32; self.columns],
        }
    }

    pub fn row_heights(&self, width: f32, fonts: &dyn FontMetrics) -> Result<Vec<f32>> {
        let widths = self.column_widths(width);
        self.rows()
            .map(|row| -> Result<f32> {
                let mut tallest: f32 = 0.0;
                for (cell, cell_width) in row.iter().zip(&widths) {
                    tallest = tallest.max(cell.height(*cell_width, fonts)?);
                }
                Ok(tallest)
            })
            .collect()
    }
}

impl Drawable for Table {
    fn height(&self, width: f32, fonts: &dyn FontMetrics) -> Result<f32> {
        Ok(self.row_heights(width, fonts)?.iter().sum())
    }

    fn natural_width(&self, width: f32, _fonts: &dyn FontMetrics) -> Result<f32> {
        Ok(width)
    }

    fn paint(&self, canvas: &mut Canvas, frame: Rect, fonts: &dyn FontMetrics) -> Result<()> {
        let widths = self.column_widths(frame.width);
        let heights = self.row_heights(frame.width, fonts)?;

        let mut y = frame.y;
        for (row, row_height) in self.rows().zip(heights) {
            let mut x = frame.x;
            for (cell, cell_width) in row.iter().zip(&widths) {
                cell.paint(canvas, Rect::new(x, y, *cell_width, row_height), fonts)?;
                x += cell_width;
            }
            y += row_height;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::Paragraph;
    use crate::canvas::DrawOp;
    use crate::fonts::{FontId, StandardFonts};
    use crate::style::{Margins, TextStyle};

    fn courier(text: &str) -> Paragraph {
        Paragraph::new(text, TextStyle::new(FontId::Courier, 10.0))
    }

    #[test]
    fn ratio_columns_split_the_width() {
        let table = Table::with_column_widths(2, &[0.9, 0.1]).unwrap();
        let widths = table.column_widths(500.0);
        assert!((widths[0] - 450.0).abs() < 1e-3);
        assert!((widths[1] - 50.0).abs() < 1e-3);
    }

    #[test]
    fn columns_default_to_an_equal_split() {
        let table = Table::new(4).unwrap();
        assert_eq!(table.column_widths(400.0), vec![100.0; 4]);
    }

    #[test]
    fn row_height_is_the_tallest_cell() {
        let mut table = Table::with_column_widths(2, &[0.9, 0.1]).unwrap();
        table.add_cell(Cell::new(courier("short")));
        // 50pt column less 4pt padding fits "one two" but not "three" as well
        table.add_cell(Cell::new(courier("one two three")));

        let first = Cell::new(courier("short")).height(450.0, &StandardFonts).unwrap();
        let second = Cell::new(courier("one two three")).height(50.0, &StandardFonts).unwrap();
        assert!((first - 12.0).abs() < 1e-4);
        assert!((second - 24.0).abs() < 1e-4);

        let heights = table.row_heights(500.0, &StandardFonts).unwrap();
        assert_eq!(heights.len(), 1);
        assert!((heights[0] - first.max(second)).abs() < 1e-4);
    }

    #[test]
    fn invalid_ratios_are_rejected() {
        for ratios in [&[0.5, 0.5, 0.0][..], &[0.9][..], &[0.6, 0.6][..], &[1.5, -0.5][..]] {
            let err = Table::with_column_widths(2, ratios).unwrap_err();
            assert!(matches!(err, Error::LayoutConstraint(_)), "{ratios:?}");
        }
        assert!(Table::new(0).is_err());
    }

    #[test]
    fn failed_ratio_update_leaves_the_table_unchanged() {
        let mut table = Table::with_column_widths(2, &[0.75, 0.25]).unwrap();
        assert!(table.set_column_widths(&[0.5, 0.4]).is_err());
        assert_eq!(table.column_widths(100.0), vec![75.0, 25.0]);
    }

    #[test]
    fn ratios_within_tolerance_are_accepted() {
        assert!(Table::with_column_widths(3, &[0.333, 0.333, 0.3335]).is_ok());
    }

    #[test]
    fn partial_rows_leave_blank_space() {
        let mut table = Table::new(3).unwrap();
        for text in ["a", "b", "c", "d"] {
            table.add_cell(Cell::new(courier(text)).with_border(1.0));
        }
        let heights = table.row_heights(300.0, &StandardFonts).unwrap();
        assert_eq!(heights.len(), 2);

        let mut canvas = Canvas::new();
        table
            .paint(&mut canvas, Rect::new(0.0, 0.0, 300.0, 24.0), &StandardFonts)
            .unwrap();
        let borders = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::StrokeRect { .. }))
            .count();
        assert_eq!(borders, 4);
    }

    #[test]
    fn background_and_border_are_drawn_before_the_content() {
        let table = Table::new(1).unwrap().with_cell(
            Cell::new(courier("x"))
                .with_background(colours::WHITE)
                .with_border(0.5),
        );
        let mut canvas = Canvas::new();
        table
            .paint(&mut canvas, Rect::new(0.0, 0.0, 100.0, 12.0), &StandardFonts)
            .unwrap();
        let ops = canvas.ops();
        assert!(matches!(ops[0], DrawOp::FillRect { .. }));
        assert!(matches!(ops[1], DrawOp::StrokeRect { .. }));
        assert!(matches!(ops[2], DrawOp::Text { .. }));
    }

    #[test]
    fn right_aligned_cells_end_at_the_padding() {
        let table = Table::new(1)
            .unwrap()
            .with_cell(Cell::new(courier("12")).with_horizontal_alignment(HorizontalAlignment::Right));
        let mut canvas = Canvas::new();
        table
            .paint(&mut canvas, Rect::new(0.0, 0.0, 100.0, 12.0), &StandardFonts)
            .unwrap();
        match &canvas.ops()[0] {
            DrawOp::Text { x, .. } => assert!((x - (100.0 - 2.0 - 12.0)).abs() < 1e-4),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn table_margins_come_from_the_enclosing_block() {
        let mut table = Table::new(1).unwrap();
        table.add_cell(Cell::new(courier("x")));
        let block = Block::from(table).with_margins(Margins::trbl(4.0, 0.0, 6.0, 0.0));
        assert!((block.outer_height(100.0, &StandardFonts).unwrap() - 22.0).abs() < 1e-4);
    }
}
