//! Markdown table rendering.

use unicode_width::UnicodeWidthStr;

/// Narrowest column, matching the three dashes of the alignment row.
const MIN_COLUMN_WIDTH: usize = 3;

/// Renders rows as a Markdown table whose first row is the header.
///
/// Cells are padded to the widest cell of their column by display width, so
/// emoji and CJK text line up in a monospaced view. Pipes inside cells are
/// escaped. Short rows are padded with empty cells.
#[must_use]
pub fn markdown_table(rows: &[Vec<String>]) -> String {
    let escaped: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| escape_cell(cell)).collect())
        .collect();

    let columns = escaped.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return String::new();
    }

    let widths: Vec<usize> = (0..columns)
        .map(|column| {
            escaped
                .iter()
                .filter_map(|row| row.get(column))
                .map(|cell| cell.width())
                .max()
                .unwrap_or(0)
                .max(MIN_COLUMN_WIDTH)
        })
        .collect();

    let mut lines = Vec::with_capacity(escaped.len() + 1);
    for (index, row) in escaped.iter().enumerate() {
        let cells = widths
            .iter()
            .enumerate()
            .map(|(column, width)| pad(row.get(column).map_or("", String::as_str), *width));
        lines.push(join_cells(cells));
        if index == 0 {
            lines.push(join_cells(widths.iter().map(|width| "-".repeat(*width))));
        }
    }
    lines.join("\n")
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}

fn pad(cell: &str, width: usize) -> String {
    let padding = width.saturating_sub(cell.width());
    format!("{cell}{}", " ".repeat(padding))
}

fn join_cells(cells: impl Iterator<Item = String>) -> String {
    let inner: Vec<String> = cells.collect();
    format!("| {} |", inner.join(" | "))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::markdown_table;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| (*cell).to_owned()).collect()
    }

    #[rstest]
    fn pads_columns_to_widest_cell() {
        let table = markdown_table(&[row(&["File", "Note"]), row(&["fr/index.mdx", "ok"])]);

        insta::assert_snapshot!(table, @r"
        | File         | Note |
        | ------------ | ---- |
        | fr/index.mdx | ok   |
        ");
    }

    #[rstest]
    fn measures_display_width() {
        let table = markdown_table(&[row(&["Locale", "Code"]), row(&["日本語", "ja"])]);

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.first(), Some(&"| Locale | Code |"));
        assert_eq!(lines.get(2), Some(&"| 日本語 | ja   |"));
    }

    #[rstest]
    fn escapes_pipes_and_fills_short_rows() {
        let table = markdown_table(&[row(&["a", "b"]), row(&["x|y"])]);

        assert_eq!(table, "| a    | b   |\n| ---- | --- |\n| x\\|y |     |");
    }

    #[rstest]
    fn empty_input_renders_nothing() {
        assert_eq!(markdown_table(&[]), "");
    }
}
