//! Up-front checks on a request.  Everything here runs before any numbers
//! are crunched, so a malformed request never produces partial work.

use crate::data::Dataset;
use crate::error::{Result, TestError};
use crate::request::{TestKind, TestRequest};

/// The most columns `select` may name
const MAX_SELECT: usize = 2;

fn invalid<T>(msg: String) -> Result<T> {
    Err(TestError::Validation(msg))
}

pub fn validate(data: &Dataset, req: &TestRequest, kind: TestKind) -> Result<()> {
    if req.select.is_empty() {
        return invalid("`select` is missing: name at least one column to test".into());
    }
    if req.select.len() > MAX_SELECT {
        return invalid(format!(
            "`select` names {} columns, but at most {} are allowed for the {}",
            req.select.len(),
            MAX_SELECT,
            kind.name()
        ));
    }
    if req.select.iter().any(|x| x.trim().is_empty()) {
        return invalid("`select` must only contain column names".into());
    }
    for (arg, val) in [("by", &req.by), ("weights", &req.weights)] {
        if let Some(val) = val {
            if val.trim().is_empty() {
                return invalid(format!("`{}` must be a single column name", arg));
            }
        }
    }
    if req.select.len() > 1 && req.by.is_some() {
        return invalid(
            "If `select` specifies more than one variable, `by` must not be specified".into(),
        );
    }
    if req.paired && req.select.len() != 2 {
        return invalid("Paired tests need exactly two columns in `select`".into());
    }
    if kind == TestKind::RankSum {
        if req.paired {
            return invalid(format!("The {} does not support paired samples", kind.name()));
        }
        if req.select.len() == 1 && req.by.is_none() {
            return invalid(
                "Only one variable provided in `select`, but none in `by`. Either provide two \
                 columns in `select`, or one column in `select` and a grouping column in `by`."
                    .into(),
            );
        }
    }
    if !req.mu.is_finite() {
        return invalid(format!("`mu` must be a finite number (got {})", req.mu));
    }

    for name in req.columns() {
        if data.get(name).is_none() {
            return invalid(unknown_column(data, name));
        }
    }

    // Every referenced column must line up row-for-row
    let n_rows = data.get(&req.select[0]).map_or(0, |v| v.column.len());
    for name in req.columns() {
        if let Some(var) = data.get(name) {
            if var.column.len() != n_rows {
                return invalid(format!(
                    "Column `{}` has {} rows, but `{}` has {}",
                    name,
                    var.column.len(),
                    req.select[0],
                    n_rows
                ));
            }
        }
    }

    for name in &req.select {
        if let Some(var) = data.get(name) {
            if !var.column.is_numeric() {
                return invalid(format!(
                    "Variable `{}` is {}, but the {} needs numeric data",
                    name,
                    var.column.type_name(),
                    kind.name()
                ));
            }
        }
    }
    if let Some(w) = &req.weights {
        if let Some(var) = data.get(w) {
            if !var.column.is_numeric() {
                return invalid(format!("Weighting variable `{}` must be numeric", w));
            }
        }
    }
    Ok(())
}

fn unknown_column(data: &Dataset, name: &str) -> String {
    match closest_column(data, name) {
        Some(suggestion) => format!(
            "Column `{}` not found in data. Possibly misspelled? Did you mean `{}`?",
            name, suggestion
        ),
        None => format!("Column `{}` not found in data", name),
    }
}

/// The existing column whose name is nearest to `name`, by edit distance.
/// Ties go to the column which comes first.
fn closest_column<'a>(data: &'a Dataset, name: &str) -> Option<&'a str> {
    data.names()
        .enumerate()
        .min_by_key(|(i, x)| (strsim::levenshtein(name, x), *i))
        .map(|(_, x)| x)
}
