//! In-memory result tables.
//!
//! A [`Frame`] holds ordered column names and rows of semantic [`Value`]s.
//! Frames loaded from different artifacts need not share a schema: [`concat`]
//! builds the column union first and fills absent cells with [`Value::Missing`].

use std::collections::HashMap;
use std::fmt;

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Narrowed numeric value, produced only by [`Frame::narrow_numeric`].
    Single(f32),
    Text(String),
}

impl Value {
    /// Convert a scalar JSON value. Returns `None` for arrays and objects.
    pub fn from_json(v: &serde_json::Value) -> Option<Value> {
        match v {
            serde_json::Value::Null => Some(Value::Missing),
            serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
            serde_json::Value::Number(n) => Some(match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            }),
            serde_json::Value::String(s) => Some(Value::Text(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::Single(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            // Debug keeps the decimal point on whole numbers ("3.0", not "3").
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Single(x) => write!(f, "{x:?}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// A table with ordered, unique column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Build a frame from rows given as (column, value) pairs.
    ///
    /// Columns are ordered by first appearance; a row lacking a column gets
    /// `Missing` there.
    pub fn from_rows(rows: Vec<Vec<(String, Value)>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for row in &rows {
            for (name, _) in row {
                if !index.contains_key(name) {
                    index.insert(name.clone(), columns.len());
                    columns.push(name.clone());
                }
            }
        }

        let rows = rows
            .into_iter()
            .map(|row| {
                let mut cells = vec![Value::Missing; columns.len()];
                for (name, value) in row {
                    cells[index[&name]] = value;
                }
                cells
            })
            .collect();

        Frame { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, top to bottom.
    #[cfg(test)]
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Assign `value` to every row of column `name`.
    ///
    /// An existing column keeps its position and is overwritten; a new
    /// column is appended.
    pub fn set_constant(&mut self, name: &str, value: Value) {
        match self.column_index(name) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = value.clone();
                }
            }
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(value.clone());
                }
            }
        }
    }

    /// Narrow every all-numeric column to single precision.
    ///
    /// Columns holding any text or boolean, and columns with no values at
    /// all, are left untouched. Returns the names of the narrowed columns.
    pub fn narrow_numeric(&mut self) -> Vec<String> {
        let mut narrowed = Vec::new();
        for idx in 0..self.columns.len() {
            let mut any_value = false;
            let all_numeric = self.rows.iter().all(|row| match &row[idx] {
                Value::Missing => true,
                v => {
                    any_value = true;
                    v.is_numeric()
                }
            });
            if !(all_numeric && any_value) {
                continue;
            }

            for row in &mut self.rows {
                let single = match &row[idx] {
                    Value::Int(i) => Value::Single(*i as f32),
                    Value::Float(x) => Value::Single(*x as f32),
                    _ => continue,
                };
                row[idx] = single;
            }
            narrowed.push(self.columns[idx].clone());
        }
        narrowed
    }

    /// Render a short textual preview: the first and last `edge` rows plus
    /// a shape footer.
    pub fn preview(&self, edge: usize) -> String {
        let shown: Vec<(usize, &Vec<Value>)> = if self.rows.len() <= edge * 2 {
            self.rows.iter().enumerate().collect()
        } else {
            let tail_start = self.rows.len() - edge;
            self.rows
                .iter()
                .enumerate()
                .filter(|(i, _)| *i < edge || *i >= tail_start)
                .collect()
        };

        let mut lines: Vec<Vec<String>> = Vec::with_capacity(shown.len() + 1);
        let mut header = vec![String::new()];
        header.extend(self.columns.iter().cloned());
        lines.push(header);
        for (i, row) in &shown {
            let mut line = vec![i.to_string()];
            line.extend(row.iter().map(|v| match v {
                Value::Missing => "NaN".to_string(),
                v => v.to_string(),
            }));
            lines.push(line);
        }

        let widths: Vec<usize> = (0..=self.columns.len())
            .map(|c| lines.iter().map(|l| l[c].len()).max().unwrap_or(0))
            .collect();

        let mut out = String::new();
        for (n, line) in lines.iter().enumerate() {
            if n == edge + 1 && self.rows.len() > edge * 2 {
                out.push_str("...\n");
            }
            let cells: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{cell:>w$}"))
                .collect();
            out.push_str(cells.join("  ").trim_end());
            out.push('\n');
        }
        out.push_str(&format!(
            "[{} rows x {} columns]",
            self.rows.len(),
            self.columns.len()
        ));
        out
    }
}

/// Stack frames row-wise over the union of their columns.
///
/// Returns `None` when `frames` is empty, since there is no schema to
/// produce.
pub fn concat(frames: Vec<Frame>) -> Option<Frame> {
    if frames.is_empty() {
        return None;
    }

    let mut columns: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for frame in &frames {
        for name in &frame.columns {
            if !index.contains_key(name) {
                index.insert(name.clone(), columns.len());
                columns.push(name.clone());
            }
        }
    }

    let total: usize = frames.iter().map(Frame::num_rows).sum();
    let mut rows = Vec::with_capacity(total);
    for frame in frames {
        let positions: Vec<usize> = frame.columns.iter().map(|c| index[c]).collect();
        for row in frame.rows {
            let mut cells = vec![Value::Missing; columns.len()];
            for (pos, value) in positions.iter().zip(row) {
                cells[*pos] = value;
            }
            rows.push(cells);
        }
    }

    Some(Frame { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Vec<(String, Value)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn from_rows_orders_columns_by_first_appearance() {
        let f = Frame::from_rows(vec![
            row(&[("b", Value::Int(1)), ("a", Value::Int(2))]),
            row(&[("c", Value::Int(3))]),
        ]);
        assert_eq!(f.columns(), &["b", "a", "c"]);
        assert_eq!(f.rows()[0][2], Value::Missing);
        assert_eq!(f.rows()[1][0], Value::Missing);
    }

    #[test]
    fn set_constant_overwrites_existing_column_in_place() {
        let mut f = Frame::from_rows(vec![
            row(&[("method", Value::Text("old".into())), ("acc", Value::Float(0.5))]),
            row(&[("method", Value::Text("old".into())), ("acc", Value::Float(0.6))]),
        ]);
        f.set_constant("method", Value::Text("GCN".into()));
        f.set_constant("runid", Value::Text("0".into()));
        assert_eq!(f.columns(), &["method", "acc", "runid"]);
        for r in f.rows() {
            assert_eq!(r[0], Value::Text("GCN".into()));
            assert_eq!(r[2], Value::Text("0".into()));
        }
    }

    #[test]
    fn concat_empty_is_none() {
        assert!(concat(Vec::new()).is_none());
    }

    #[test]
    fn concat_fills_missing_columns() {
        let a = Frame::from_rows(vec![row(&[("acc", Value::Float(0.9))])]);
        let b = Frame::from_rows(vec![
            row(&[("auroc", Value::Float(0.7))]),
            row(&[("auroc", Value::Float(0.8)), ("acc", Value::Float(0.1))]),
        ]);
        let out = concat(vec![a, b]).unwrap();
        assert_eq!(out.columns(), &["acc", "auroc"]);
        assert_eq!(out.num_rows(), 3);
        assert_eq!(out.rows()[0], vec![Value::Float(0.9), Value::Missing]);
        assert_eq!(out.rows()[1], vec![Value::Missing, Value::Float(0.7)]);
        assert_eq!(out.rows()[2], vec![Value::Float(0.1), Value::Float(0.8)]);
    }

    #[test]
    fn concat_conserves_row_count() {
        let frames: Vec<Frame> = (1..=4)
            .map(|n| {
                Frame::from_rows(
                    (0..n)
                        .map(|i| row(&[(&*format!("c{n}"), Value::Int(i))]))
                        .collect(),
                )
            })
            .collect();
        let expected: usize = frames.iter().map(Frame::num_rows).sum();
        let out = concat(frames).unwrap();
        assert_eq!(out.num_rows(), expected);
        assert_eq!(out.columns().len(), 4);
    }

    #[test]
    fn narrow_numeric_skips_text_and_bool_columns() {
        let mut f = Frame::from_rows(vec![
            row(&[
                ("acc", Value::Float(0.1)),
                ("epochs", Value::Int(3)),
                ("runid", Value::Text("0".into())),
                ("best", Value::Bool(true)),
                ("empty", Value::Missing),
            ]),
            row(&[("acc", Value::Missing), ("epochs", Value::Int(4))]),
        ]);
        let narrowed = f.narrow_numeric();
        assert_eq!(narrowed, vec!["acc", "epochs"]);
        assert_eq!(f.rows()[0][0], Value::Single(0.1));
        assert_eq!(f.rows()[0][1], Value::Single(3.0));
        assert_eq!(f.rows()[0][2], Value::Text("0".into()));
        assert_eq!(f.rows()[0][3], Value::Bool(true));
        assert_eq!(f.rows()[1][0], Value::Missing);
    }

    #[test]
    fn narrow_numeric_leaves_mixed_column() {
        let mut f = Frame::from_rows(vec![
            row(&[("x", Value::Int(1))]),
            row(&[("x", Value::Text("n/a".into()))]),
        ]);
        assert!(f.narrow_numeric().is_empty());
        assert_eq!(f.rows()[0][0], Value::Int(1));
    }

    #[test]
    fn display_keeps_decimal_point() {
        assert_eq!(Value::Single(3.0).to_string(), "3.0");
        assert_eq!(Value::Single(0.1).to_string(), "0.1");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
        assert_eq!(Value::Int(7).to_string(), "7");
        assert_eq!(Value::Missing.to_string(), "");
    }

    #[test]
    fn from_json_rejects_nested() {
        assert_eq!(
            Value::from_json(&serde_json::json!(null)),
            Some(Value::Missing)
        );
        assert_eq!(Value::from_json(&serde_json::json!(2)), Some(Value::Int(2)));
        assert!(Value::from_json(&serde_json::json!([1])).is_none());
        assert!(Value::from_json(&serde_json::json!({"a": 1})).is_none());
    }

    #[test]
    fn preview_truncates_long_tables() {
        let f = Frame::from_rows(
            (0..20)
                .map(|i| row(&[("acc", Value::Int(i))]))
                .collect(),
        );
        let p = f.preview(2);
        assert!(p.contains("..."));
        assert!(p.ends_with("[20 rows x 1 columns]"));
        // header, two head rows, ellipsis, two tail rows, footer
        assert_eq!(p.lines().count(), 7);
        assert!(p.lines().any(|l| l.trim_start().starts_with("19")));
        assert!(!p.lines().any(|l| l.trim_start().starts_with("10")));
    }

    #[test]
    fn preview_shows_missing_as_nan() {
        let f = Frame::from_rows(vec![
            row(&[("a", Value::Int(1))]),
            row(&[("b", Value::Int(2))]),
        ]);
        let p = f.preview(5);
        assert!(p.contains("NaN"));
        assert!(!p.contains("..."));
    }
}
