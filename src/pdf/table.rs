//! Content-stream rendering of the schedule table
//!
//! The output uses two font resources, `/F1` (Helvetica) and `/F2`
//! (Helvetica-Bold), which the caller must provide in the resource dictionary
//! of whatever the stream ends up in.

use std::fmt::Write;

use crate::layout::TableLayout;

/// Resource name of the body font
pub const FONT_REGULAR: &str = "F1";
/// Resource name of the header font
pub const FONT_BOLD: &str = "F2";

/// RGB colour with components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
struct Rgb(f32, f32, f32);

const HEADER_FILL: Rgb = Rgb(0.502, 0.502, 0.502); // grey
const HEADER_TEXT: Rgb = Rgb(0.961, 0.961, 0.961); // whitesmoke
const BODY_FILL: Rgb = Rgb(0.961, 0.961, 0.863); // beige
const BODY_TEXT: Rgb = Rgb(0.0, 0.0, 0.0);

/// Cap height of Helvetica as a fraction of the font size
const CAP_HEIGHT: f32 = 0.718;

/// Generate PDF operators drawing `table` with its bottom-left corner at `origin`
///
/// The first row is styled as the header; every other row as body.
pub fn render_table(table: &[[String; 6]], layout: &TableLayout, origin: (f32, f32)) -> String {
    let mut content = String::new();
    if table.is_empty() {
        return content;
    }

    let (x, y) = origin;
    let width = layout.table_width();
    let body_rows = table.len() - 1;
    let top = y + layout.table_height(body_rows);
    let header_bottom = top - layout.header_row_height;
    let offsets = layout.column_offsets();

    // Backgrounds
    set_fill(&mut content, BODY_FILL);
    let _ = writeln!(
        content,
        "{:.2} {:.2} {:.2} {:.2} re f",
        x,
        y,
        width,
        header_bottom - y
    );
    set_fill(&mut content, HEADER_FILL);
    let _ = writeln!(
        content,
        "{:.2} {:.2} {:.2} {:.2} re f",
        x, header_bottom, width, layout.header_row_height
    );

    // Cells
    for (row_index, row) in table.iter().enumerate() {
        let is_header = row_index == 0;
        let (row_bottom, row_height, font, font_size, color) = if is_header {
            (
                header_bottom,
                layout.header_row_height,
                FONT_BOLD,
                layout.header_font_size,
                HEADER_TEXT,
            )
        } else {
            (
                header_bottom - row_index as f32 * layout.body_row_height,
                layout.body_row_height,
                FONT_REGULAR,
                layout.body_font_size,
                BODY_TEXT,
            )
        };

        let baseline = row_bottom + (row_height - font_size * CAP_HEIGHT) / 2.0;

        for (column, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let Some(column_width) = layout.column_widths.get(column) else {
                continue;
            };

            let text_width = estimate_text_width(cell, font_size, is_header);
            let cell_x = x + offsets[column] + (column_width - text_width) / 2.0;

            content.push_str("BT\n");
            set_fill(&mut content, color);
            let _ = writeln!(content, "/{} {} Tf", font, font_size);
            let _ = writeln!(content, "1 0 0 1 {:.2} {:.2} Tm", cell_x, baseline);
            let _ = writeln!(content, "<{}> Tj", encode_win_ansi(cell));
            content.push_str("ET\n");
        }
    }

    content
}

fn set_fill(content: &mut String, color: Rgb) {
    let _ = writeln!(content, "{:.3} {:.3} {:.3} rg", color.0, color.1, color.2);
}

/// Hex string of `text` in WinAnsiEncoding
///
/// Latin-1 characters map to themselves; anything else becomes `?`.
fn encode_win_ansi(text: &str) -> String {
    text.chars()
        .map(|c| {
            let code = c as u32;
            let byte = if (0x20..0x7f).contains(&code) || (0xa0..=0xff).contains(&code) {
                code as u8
            } else {
                b'?'
            };
            format!("{:02X}", byte)
        })
        .collect()
}

/// Estimate text width for Helvetica
fn estimate_text_width(text: &str, font_size: f32, bold: bool) -> f32 {
    let em: f32 = text
        .chars()
        .map(|c| match c {
            '0'..='9' => 0.556,
            ':' | ' ' | '.' => 0.278,
            'I' => 0.278,
            'M' => 0.833,
            c if c.is_uppercase() => {
                if bold {
                    0.722
                } else {
                    0.667
                }
            }
            _ => 0.5,
        })
        .sum();
    em * font_size
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Vec<[String; 6]> {
        vec![
            ["DIA", "MAÑANAS ENTRADA", "MAÑANAS SALIDA", "TARDES ENTRADA", "TARDES SALIDA", "HORAS ORDINARIAS"]
                .map(String::from),
            ["1", "", "", "", "", ""].map(String::from),
            ["2", "08:00", "14:00", "15:00", "18:00", "8"].map(String::from),
            ["TOTAL", "", "", "", "", "8"].map(String::from),
        ]
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("DIA"), "444941");
        // Ñ is 0xD1 in WinAnsiEncoding
        assert_eq!(encode_win_ansi("Ñ"), "D1");
        assert_eq!(encode_win_ansi("€"), "3F");
    }

    #[test]
    fn test_render_counts_text_objects() {
        let content = render_table(&sample_table(), &TableLayout::default(), (124.0, 292.0));

        // 6 header cells, 1 for the blank day, 6 for the workday, 2 for the total
        assert_eq!(content.matches("BT\n").count(), 15);
        assert_eq!(content.matches("ET\n").count(), 15);
        assert_eq!(content.matches(" re f").count(), 2);
        assert!(content.contains("/F2 7 Tf"));
        assert!(content.contains("/F1 6 Tf"));
    }

    #[test]
    fn test_render_places_table_bottom_at_origin() {
        let layout = TableLayout::default();
        let content = render_table(&sample_table(), &layout, (124.0, 292.0));

        // Body background starts at the origin
        assert!(content.contains("124.00 292.00 360.00"));
    }

    #[test]
    fn test_render_empty_table() {
        assert!(render_table(&[], &TableLayout::default(), (0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_estimate_text_width() {
        // Four digits and a colon
        let width = estimate_text_width("08:00", 10.0, false);
        assert!((width - (4.0 * 5.56 + 2.78)).abs() < 0.01);
    }
}
