//! Plain ASCII tables

use std::fmt::Write;

/// A bordered table with an upper-cased header row
///
/// ```text
/// +---------+--------+
/// | PRODUCT | LATEST |
/// +---------+--------+
/// | go      | 1.23.2 |
/// +---------+--------+
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Missing cells render empty; extra cells are dropped.
    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells: Vec<String> = row.into_iter().map(Into::into).collect();
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();

        let mut separator = String::from("+");
        for width in &widths {
            separator.push_str(&"-".repeat(width + 2));
            separator.push('+');
        }

        let line = |cells: &[String]| {
            let mut out = String::from("|");
            for (cell, width) in cells.iter().zip(&widths) {
                let _ = write!(out, " {:<width$} |", cell, width = *width);
            }
            out
        };

        let headers: Vec<String> = self.headers.iter().map(|h| h.to_uppercase()).collect();

        let mut out = String::new();
        out.push_str(&separator);
        out.push('\n');
        out.push_str(&line(&headers));
        out.push('\n');
        out.push_str(&separator);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row));
            out.push('\n');
        }
        if !self.rows.is_empty() {
            out.push_str(&separator);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_pads_columns_to_widest_cell() {
        let mut table = Table::new(["Product"]);
        table.push_row(["go"]);
        table.push_row(["nodejs"]);

        assert_eq!(
            table.render(),
            "+---------+\n\
             | PRODUCT |\n\
             +---------+\n\
             | go      |\n\
             | nodejs  |\n\
             +---------+\n"
        );
    }

    #[test]
    fn render_widens_column_for_long_cell() {
        let mut table = Table::new(["Cycle", "EOL"]);
        table.push_row(["3.12", "2028-10-31"]);

        assert_eq!(
            table.render(),
            "+-------+------------+\n\
             | CYCLE | EOL        |\n\
             +-------+------------+\n\
             | 3.12  | 2028-10-31 |\n\
             +-------+------------+\n"
        );
    }

    #[test]
    fn push_row_fills_missing_cells() {
        let mut table = Table::new(["A", "B"]);
        table.push_row(["x"]);

        assert_eq!(table.len(), 1);
        assert!(table.render().contains("| x |   |"));
    }

    #[test]
    fn render_without_rows_prints_header_only() {
        let table = Table::new(["Product"]);

        assert!(table.is_empty());
        assert_eq!(table.render(), "+---------+\n| PRODUCT |\n+---------+\n");
    }
}
