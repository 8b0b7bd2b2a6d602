//! Page and table layout calculations
//!
//! All values are PDF points (1/72 inch) with the origin at the bottom-left of
//! the page.

/// Simple length type in points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(pub f32);

impl Length {
    /// Create a length from points
    pub fn from_pt(pt: f32) -> Self {
        Length(pt)
    }

    /// Get the value in points
    pub fn pt(&self) -> f32 {
        self.0
    }
}

/// Page dimensions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimensions {
    pub width: Length,
    pub height: Length,
}

impl PageDimensions {
    /// US Letter size (8.5" × 11")
    pub fn letter() -> Self {
        Self {
            width: Length::from_pt(612.0),
            height: Length::from_pt(792.0),
        }
    }

    /// Dimensions of a `[llx lly urx ury]` box
    pub fn from_box(llx: f32, lly: f32, urx: f32, ury: f32) -> Self {
        Self {
            width: Length::from_pt((urx - llx).abs()),
            height: Length::from_pt((ury - lly).abs()),
        }
    }
}

/// Geometry of the schedule table
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayout {
    pub column_widths: Vec<f32>,
    pub header_row_height: f32,
    pub body_row_height: f32,
    pub header_font_size: f32,
    pub body_font_size: f32,
    /// Distance from the top of the page down to the table's bottom edge
    pub bottom_from_top: f32,
    /// Extra horizontal shift applied after centering
    pub x_adjust: f32,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            column_widths: vec![40.0, 70.0, 70.0, 70.0, 70.0, 40.0],
            header_row_height: 14.0,
            body_row_height: 11.0,
            header_font_size: 7.0,
            body_font_size: 6.0,
            bottom_from_top: 500.0,
            x_adjust: -2.0,
        }
    }
}

impl TableLayout {
    pub fn table_width(&self) -> f32 {
        self.column_widths.iter().sum()
    }

    /// Height of a table with one header row and `body_rows` further rows
    pub fn table_height(&self, body_rows: usize) -> f32 {
        self.header_row_height + body_rows as f32 * self.body_row_height
    }

    /// Bottom-left corner of the table on `page`
    pub fn origin(&self, page: &PageDimensions) -> (f32, f32) {
        let x = (page.width.pt() - self.table_width()) / 2.0 + self.x_adjust;
        let y = page.height.pt() - self.bottom_from_top;
        (x, y)
    }

    /// Left edge of each column relative to the table's left edge
    pub fn column_offsets(&self) -> Vec<f32> {
        self.column_widths
            .iter()
            .scan(0.0, |acc, width| {
                let offset = *acc;
                *acc += width;
                Some(offset)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_size() {
        let letter = PageDimensions::letter();
        assert_eq!(letter.width.pt(), 612.0);
        assert_eq!(letter.height.pt(), 792.0);
    }

    #[test]
    fn test_table_origin_on_letter() {
        let layout = TableLayout::default();
        assert_eq!(layout.table_width(), 360.0);

        let (x, y) = layout.origin(&PageDimensions::letter());
        // (612 - 360) / 2 - 2
        assert_eq!(x, 124.0);
        // 792 - 500
        assert_eq!(y, 292.0);
    }

    #[test]
    fn test_column_offsets() {
        let layout = TableLayout::default();
        assert_eq!(layout.column_offsets(), vec![0.0, 40.0, 110.0, 180.0, 250.0, 320.0]);
    }

    #[test]
    fn test_table_height() {
        let layout = TableLayout::default();
        // Header plus 31 days plus total
        assert_eq!(layout.table_height(32), 14.0 + 32.0 * 11.0);
    }

    #[test]
    fn test_from_box() {
        let dims = PageDimensions::from_box(0.0, 0.0, 595.0, 842.0);
        assert_eq!(dims.width.pt(), 595.0);
        assert_eq!(dims.height.pt(), 842.0);
    }
}
