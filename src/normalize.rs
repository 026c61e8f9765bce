//! Bring every request into one shape: a single value column, optionally
//! a single grouping column, optionally a single weight column.

use crate::data::{Dataset, Factor};
use crate::error::{Result, TestError};
use crate::request::TestRequest;
use log::*;
use std::collections::BTreeMap;

/// A categorical column along with any display labels for its levels.
#[derive(Clone, Debug, PartialEq)]
pub struct Grouping {
    pub name: String,
    pub factor: Factor,
    pub value_labels: BTreeMap<String, String>,
}

/// The canonical long form of a request's data.
#[derive(Clone, Debug, PartialEq)]
pub struct Normalized {
    pub values: Vec<f64>,
    pub weights: Option<Vec<f64>>,
    /// `None` for one-sample and paired tests
    pub groups: Option<Grouping>,
    /// How to describe the values when there's only one sample
    pub sample_label: String,
    pub paired: bool,
}

/// Assumes `req` has already been validated against `data`.
pub fn normalize(data: &Dataset, req: &TestRequest) -> Result<Normalized> {
    let column = |name: &str| {
        data.get(name)
            .map(|v| &v.column)
            .ok_or_else(|| TestError::Validation(format!("Column `{}` not found in data", name)))
    };

    let referenced = req.columns().map(column).collect::<Result<Vec<_>>>()?;
    let n_rows = referenced.first().map_or(0, |c| c.len());
    let rows = (0..n_rows)
        .filter(|&i| referenced.iter().all(|c| !c.is_missing(i)))
        .collect::<Vec<usize>>();
    if rows.len() < n_rows {
        info!(
            "Dropped {} of {} rows with missing values",
            n_rows - rows.len(),
            n_rows
        );
    }

    let numbers = |name: &str| -> Result<Vec<f64>> {
        let col = column(name)?;
        rows.iter()
            .map(|&i| {
                col.number(i).ok_or_else(|| {
                    TestError::Validation(format!("Variable `{}` must be numeric", name))
                })
            })
            .collect()
    };

    let weights = match &req.weights {
        Some(w) => {
            let ws = numbers(w)?;
            if let Some(bad) = ws.iter().find(|w| !w.is_finite() || **w < 0.) {
                return Err(TestError::Validation(format!(
                    "Weights must be finite and non-negative (found {} in `{}`)",
                    bad, w
                )));
            }
            Some(ws)
        }
        None => None,
    };

    let first = &req.select[0];
    match req.select.get(1) {
        None => {
            // One column: pass through, possibly with a grouping column
            let groups = match &req.by {
                Some(by) => {
                    let var = data.get(by).ok_or_else(|| {
                        TestError::Validation(format!("Column `{}` not found in data", by))
                    })?;
                    let full = var.column.to_factor();
                    Some(Grouping {
                        name: by.clone(),
                        factor: Factor {
                            levels: full.levels,
                            codes: rows.iter().map(|&i| full.codes[i]).collect(),
                        },
                        value_labels: var.value_labels.clone(),
                    })
                }
                None => None,
            };
            Ok(Normalized {
                values: numbers(first)?,
                weights,
                groups,
                sample_label: first.clone(),
                paired: false,
            })
        }
        Some(second) if req.paired => {
            let xs = numbers(first)?;
            let ys = numbers(second)?;
            Ok(Normalized {
                values: xs.iter().zip(&ys).map(|(x, y)| x - y).collect(),
                weights,
                groups: None,
                sample_label: format!("{} and {}", first, second),
                paired: true,
            })
        }
        Some(second) => {
            // Wide to long: the first column becomes the first group
            let xs = numbers(first)?;
            let ys = numbers(second)?;
            let n = xs.len();
            let codes = std::iter::repeat(Some(0))
                .take(n)
                .chain(std::iter::repeat(Some(1)).take(n))
                .collect();
            Ok(Normalized {
                values: xs.into_iter().chain(ys).collect(),
                weights: weights.map(|ws| ws.iter().chain(&ws).copied().collect()),
                groups: Some(Grouping {
                    name: "group".into(),
                    factor: Factor {
                        levels: vec![first.clone(), second.clone()],
                        codes,
                    },
                    value_labels: BTreeMap::new(),
                }),
                sample_label: format!("{} and {}", first, second),
                paired: false,
            })
        }
    }
}
