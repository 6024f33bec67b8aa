//! CSV to markdown table conversion.

use crate::text_helpers::split_lines;

/// Table inserted when nothing is selected.
pub const EMPTY_TABLE: &str = "|---|---|---|\n| a | b | c |\n";

/// Convert comma-separated rows into a pipe table.
///
/// Every input row becomes a body row; cells are emitted verbatim. The
/// separator row on top gets one `---` column per cell of the widest row, so
/// ragged input still produces a separator that covers every column. Rows
/// with fewer cells are left short.
pub fn csv_to_table(csv: &str) -> String {
    let mut body = String::new();
    let mut columns = 0;

    for line in split_lines(csv) {
        let cells: Vec<&str> = line.split(',').collect();
        columns = columns.max(cells.len());

        body.push('|');
        for cell in &cells {
            body.push(' ');
            body.push_str(cell);
            body.push_str(" |");
        }
        body.push('\n');
    }

    let mut table = String::from("|");
    table.push_str(&"---|".repeat(columns));
    table.push('\n');
    table.push_str(&body);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangular_csv() {
        assert_eq!(
            csv_to_table("a,b,c\n1,2,3"),
            "|---|---|---|\n| a | b | c |\n| 1 | 2 | 3 |\n"
        );
    }

    #[test]
    fn test_single_cell() {
        assert_eq!(csv_to_table("solo"), "|---|\n| solo |\n");
    }

    #[test]
    fn test_ragged_rows_use_widest() {
        // Counting only the last row would give two columns here.
        assert_eq!(
            csv_to_table("a,b,c\n1,2"),
            "|---|---|---|\n| a | b | c |\n| 1 | 2 |\n"
        );
        assert_eq!(
            csv_to_table("a\n1,2,3,4"),
            "|---|---|---|---|\n| a |\n| 1 | 2 | 3 | 4 |\n"
        );
    }

    #[test]
    fn test_cells_are_not_trimmed() {
        assert_eq!(csv_to_table("a, b"), "|---|---|\n| a |  b |\n");
    }
}
