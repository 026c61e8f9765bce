use crate::error::{Result, TestError};
use crate::normalize::Normalized;
use crate::request::TestKind;

/// The observations of one group, ready for a calculator.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleGroup {
    pub label: String,
    pub values: Vec<f64>,
    /// Parallel to `values`
    pub weights: Option<Vec<f64>>,
}

impl SampleGroup {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(value, weight)` pairs; unweighted groups get a weight of 1
    pub fn weighted_values(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let ws = self.weights.as_deref();
        self.values
            .iter()
            .enumerate()
            .map(move |(i, x)| (*x, ws.map_or(1., |ws| ws[i])))
    }
}

/// Split normalized data into one group per level (in level order), or a
/// single group for one-sample and paired requests.
pub fn resolve(norm: Normalized, kind: TestKind) -> Result<Vec<SampleGroup>> {
    let grouping = match norm.groups {
        None => {
            return Ok(vec![SampleGroup {
                label: norm.sample_label,
                values: norm.values,
                weights: norm.weights,
            }])
        }
        Some(g) => g,
    };

    let factor = grouping.factor.drop_unused_levels();
    let n_levels = factor.levels.len();
    if n_levels > 2 {
        return Err(TestError::TooManyGroups {
            column: grouping.name,
            levels: n_levels,
            alternative: kind.multi_group_alternative(),
        });
    }
    if n_levels < 2 {
        return Err(TestError::InsufficientData(format!(
            "Grouping variable `{}` has {} group(s) with observations, but the {} needs 2",
            grouping.name,
            n_levels,
            kind.name()
        )));
    }

    let mut groups = factor
        .levels
        .iter()
        .map(|level| SampleGroup {
            label: grouping
                .value_labels
                .get(level)
                .cloned()
                .unwrap_or_else(|| level.clone()),
            values: vec![],
            weights: norm.weights.as_ref().map(|_| vec![]),
        })
        .collect::<Vec<_>>();
    for (i, code) in factor.codes.iter().enumerate() {
        if let Some(code) = code {
            let group = &mut groups[*code];
            group.values.push(norm.values[i]);
            if let (Some(dst), Some(src)) = (&mut group.weights, &norm.weights) {
                dst.push(src[i]);
            }
        }
    }
    Ok(groups)
}
