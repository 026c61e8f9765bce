//! Column-oriented datasets.
//!
//! A [`Dataset`] is a list of named, row-aligned [`Variable`]s.  Every cell
//! may be missing.  The engine only ever reads a dataset; it never mutates
//! the caller's copy.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Factor(Factor),
}

/// A categorical column: each cell is an index into `levels`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Factor {
    pub levels: Vec<String>,
    pub codes: Vec<Option<usize>>,
}

impl Factor {
    /// Builds a factor from raw values, with levels in the given order.
    /// Values which aren't one of the levels become missing.
    pub fn new<'a>(levels: &[&str], values: impl IntoIterator<Item = &'a str>) -> Factor {
        let codes = values
            .into_iter()
            .map(|v| levels.iter().position(|l| *l == v))
            .collect();
        Factor {
            levels: levels.iter().map(|x| x.to_string()).collect(),
            codes,
        }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Drop the levels which have no observations, keeping the order of the
    /// rest.
    pub fn drop_unused_levels(&self) -> Factor {
        let used = self.codes.iter().flatten().copied().collect::<BTreeSet<usize>>();
        let remap = (0..self.levels.len())
            .scan(0, |next, i| {
                Some(if used.contains(&i) {
                    *next += 1;
                    Some(*next - 1)
                } else {
                    None
                })
            })
            .collect::<Vec<_>>();
        Factor {
            levels: self
                .levels
                .iter()
                .enumerate()
                .filter(|(i, _)| used.contains(i))
                .map(|(_, l)| l.clone())
                .collect(),
            codes: self.codes.iter().map(|c| c.and_then(|c| remap[c])).collect(),
        }
    }
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(xs) => xs.len(),
            Column::Text(xs) => xs.len(),
            Column::Factor(f) => f.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Column::Numeric(_) => "numeric",
            Column::Text(_) => "text",
            Column::Factor(_) => "categorical",
        }
    }

    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            Column::Numeric(xs) => xs[row].map_or(true, f64::is_nan),
            Column::Text(xs) => xs[row].is_none(),
            Column::Factor(f) => f.codes[row].is_none(),
        }
    }

    /// The value of a numeric cell, or `None` for missing cells and
    /// non-numeric columns.
    pub fn number(&self, row: usize) -> Option<f64> {
        match self {
            Column::Numeric(xs) => xs[row].filter(|x| !x.is_nan()),
            _ => None,
        }
    }

    /// Coerce to a factor.  Numbers are ordered numerically, text
    /// lexicographically; existing factors keep their level order.
    pub fn to_factor(&self) -> Factor {
        match self {
            Column::Factor(f) => f.clone(),
            Column::Numeric(xs) => {
                // Adding 0 folds -0 into 0, so both land on one level
                let mut uniq = xs
                    .iter()
                    .flatten()
                    .filter(|x| !x.is_nan())
                    .map(|x| x + 0.)
                    .collect::<Vec<f64>>();
                uniq.sort_by(f64::total_cmp);
                uniq.dedup();
                let codes = xs
                    .iter()
                    .map(|x| {
                        let x = x.filter(|x| !x.is_nan())? + 0.;
                        uniq.binary_search_by(|u| u.total_cmp(&x)).ok()
                    })
                    .collect();
                Factor {
                    levels: uniq.iter().map(|x| x.to_string()).collect(),
                    codes,
                }
            }
            Column::Text(xs) => {
                let uniq = xs.iter().flatten().cloned().collect::<BTreeSet<String>>();
                let levels = uniq.into_iter().collect::<Vec<_>>();
                let codes = xs
                    .iter()
                    .map(|x| levels.binary_search(x.as_ref()?).ok())
                    .collect();
                Factor { levels, codes }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Variable {
    pub name: String,
    pub column: Column,
    /// Display labels, keyed by the level they describe
    pub value_labels: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Dataset {
    vars: Vec<Variable>,
}

impl Dataset {
    pub fn new() -> Dataset {
        Dataset::default()
    }

    /// Adds a column, replacing any existing column of the same name.
    pub fn insert(&mut self, name: impl Into<String>, column: Column) {
        let name = name.into();
        let var = Variable {
            name: name.clone(),
            column,
            value_labels: BTreeMap::new(),
        };
        match self.vars.iter_mut().find(|v| v.name == name) {
            Some(existing) => *existing = var,
            None => self.vars.push(var),
        }
    }

    /// Adds a numeric column.  NaNs are treated as missing.
    pub fn with_numeric(mut self, name: &str, values: impl IntoIterator<Item = f64>) -> Dataset {
        let xs = values
            .into_iter()
            .map(|x| if x.is_nan() { None } else { Some(x) })
            .collect();
        self.insert(name, Column::Numeric(xs));
        self
    }

    pub fn with_text<'a>(mut self, name: &str, values: impl IntoIterator<Item = &'a str>) -> Dataset {
        let xs = values.into_iter().map(|x| Some(x.to_string())).collect();
        self.insert(name, Column::Text(xs));
        self
    }

    pub fn with_factor<'a>(
        mut self,
        name: &str,
        levels: &[&str],
        values: impl IntoIterator<Item = &'a str>,
    ) -> Dataset {
        self.insert(name, Column::Factor(Factor::new(levels, values)));
        self
    }

    /// Attaches display labels to the levels of an existing column.  Does
    /// nothing if there's no such column.
    pub fn with_value_labels<'a>(
        mut self,
        name: &str,
        labels: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Dataset {
        if let Some(var) = self.vars.iter_mut().find(|v| v.name == name) {
            var.value_labels
                .extend(labels.into_iter().map(|(k, v)| (k.to_string(), v.to_string())));
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.vars.iter().find(|v| v.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.vars.iter().map(|v| v.name.as_str())
    }

    pub fn n_rows(&self) -> usize {
        self.vars.first().map_or(0, |v| v.column.len())
    }

    /// Reads a CSV file with a header row.  A column whose non-missing
    /// cells all parse as numbers becomes numeric; everything else is text.
    /// Empty cells and `NA` are missing.
    pub fn from_csv<R: io::Read>(rdr: R) -> Result<Dataset, csv::Error> {
        let mut rdr = csv::Reader::from_reader(rdr);
        let names = rdr.headers()?.iter().map(str::to_string).collect::<Vec<_>>();
        let mut cells: Vec<Vec<Option<String>>> = vec![vec![]; names.len()];
        for row in rdr.into_records() {
            let row = row?;
            for (col, field) in cells.iter_mut().zip(row.iter()) {
                let field = field.trim();
                col.push(if field.is_empty() || field == "NA" {
                    None
                } else {
                    Some(field.to_string())
                });
            }
        }
        let mut data = Dataset::new();
        for (name, col) in names.into_iter().zip(cells) {
            data.insert(name, infer_column(col));
        }
        Ok(data)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Dataset, csv::Error> {
        let file = std::fs::File::open(path)?;
        Dataset::from_csv(file)
    }
}

fn infer_column(cells: Vec<Option<String>>) -> Column {
    let parsed = cells
        .iter()
        .map(|c| c.as_deref().map(str::parse::<f64>).transpose())
        .collect::<Result<Vec<Option<f64>>, _>>();
    match parsed {
        Ok(xs) => Column::Numeric(xs),
        Err(_) => Column::Text(cells),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_types() {
        let input = "score,sex,group\n1.5,m,a\n2,f,\nNA,f,b\n";
        let data = Dataset::from_csv(input.as_bytes()).unwrap();
        assert_eq!(data.n_rows(), 3);
        assert_eq!(data.names().collect::<Vec<_>>(), vec!["score", "sex", "group"]);
        assert_eq!(
            data.get("score").unwrap().column,
            Column::Numeric(vec![Some(1.5), Some(2.), None])
        );
        assert!(!data.get("sex").unwrap().column.is_numeric());
        let group = &data.get("group").unwrap().column;
        assert!(group.is_missing(1));
        assert!(!group.is_missing(2));
    }

    #[test]
    fn numeric_levels_sort_numerically() {
        let col = Column::Numeric(vec![Some(10.), Some(2.), None, Some(2.), Some(1.)]);
        let f = col.to_factor();
        assert_eq!(f.levels, vec!["1", "2", "10"]);
        assert_eq!(f.codes, vec![Some(2), Some(1), None, Some(1), Some(0)]);
    }

    #[test]
    fn signed_zeros_share_a_level() {
        let col = Column::Numeric(vec![Some(-0.), Some(0.), Some(0.), Some(1.), Some(1.), Some(1.)]);
        let f = col.to_factor();
        assert_eq!(f.levels, vec!["0", "1"]);
        assert_eq!(f.codes, vec![Some(0), Some(0), Some(0), Some(1), Some(1), Some(1)]);
    }

    #[test]
    fn text_levels_sort_lexically() {
        let data = Dataset::new().with_text("g", vec!["b", "a", "b"]);
        let f = data.get("g").unwrap().column.to_factor();
        assert_eq!(f.levels, vec!["a", "b"]);
        assert_eq!(f.codes, vec![Some(1), Some(0), Some(1)]);
    }

    #[test]
    fn factor_keeps_level_order() {
        let f = Factor::new(&["post", "pre", "never"], vec!["pre", "post", "pre", "bogus"]);
        assert_eq!(f.codes, vec![Some(1), Some(0), Some(1), None]);
        let f = f.drop_unused_levels();
        assert_eq!(f.levels, vec!["post", "pre"]);
        assert_eq!(f.codes, vec![Some(1), Some(0), Some(1), None]);
    }

    #[test]
    fn insert_replaces() {
        let data = Dataset::new()
            .with_numeric("x", vec![1., 2.])
            .with_numeric("x", vec![3., f64::NAN])
            .with_value_labels("x", vec![("3", "three")]);
        assert_eq!(data.names().count(), 1);
        let x = data.get("x").unwrap();
        assert_eq!(x.column.number(0), Some(3.));
        assert_eq!(x.column.number(1), None);
        assert_eq!(x.value_labels["3"], "three");
    }
}
