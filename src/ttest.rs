//! Student's t-tests: one-sample (including paired differences) and Welch's
//! two-sample test, with or without observation weights.

use crate::effect::{self, EffectSize};
use crate::error::{Result, TestError};
use crate::groups::SampleGroup;
use crate::request::Alternative;
use log::*;
use sample_stats::{Moments, SampleStats, WeightedStats};

/// What a t-test calculator produces, before it's dressed up as a
/// [`crate::TestResult`].
#[derive(Clone, Debug, PartialEq)]
pub struct TTestOutcome {
    pub statistic: f64,
    pub df: f64,
    pub p_value: f64,
    pub effect_size: EffectSize,
    /// Per group: the mean (weighted, if weights were given)
    pub means: Vec<f64>,
    /// Per group: the observation count, or the rounded sum of the weights
    pub sizes: Vec<f64>,
}

pub fn t_p_value(t: f64, df: f64, alternative: Alternative) -> Result<f64> {
    Ok(match alternative {
        Alternative::Less => sample_stats::student_t_lower(t, df)?,
        Alternative::Greater => sample_stats::student_t_upper(t, df)?,
        Alternative::TwoSided => sample_stats::student_t_two_sided(t, df)?,
    })
}

fn wrong_group_count(n: usize) -> TestError {
    TestError::Validation(format!("a t-test needs one or two samples, got {}", n))
}

fn check_sizes(groups: &[SampleGroup]) -> Result<()> {
    for g in groups {
        if g.len() < 2 {
            return Err(TestError::InsufficientData(format!(
                "group `{}` has {} observation(s); at least 2 are needed to estimate its variance",
                g.label,
                g.len()
            )));
        }
    }
    Ok(())
}

/// (t, df) for `x.mean` against `mu`
fn one_sample(x: &impl Moments, mu: f64) -> Result<(f64, f64)> {
    let se = x.mean_var().sqrt();
    if !(se > 0.) || !se.is_finite() {
        return Err(TestError::NumericDegeneracy(
            "data are essentially constant".into(),
        ));
    }
    Ok(((x.mean() - mu) / se, x.count() as f64 - 1.))
}

/// (t, df) for `x.mean - y.mean` against `mu`, with Welch–Satterthwaite
/// degrees of freedom
fn two_sample(x: &impl Moments, y: &impl Moments, mu: f64) -> Result<(f64, f64)> {
    let df = sample_stats::welch_dof(x, y)?;
    let se = (x.mean_var() + y.mean_var()).sqrt();
    Ok(((x.mean() - y.mean() - mu) / se, df))
}

pub fn unweighted(groups: &[SampleGroup], alternative: Alternative, mu: f64) -> Result<TTestOutcome> {
    check_sizes(groups)?;
    let stats = groups
        .iter()
        .map(|g| g.values.iter().copied().collect::<SampleStats>())
        .collect::<Vec<_>>();
    let (statistic, df) = match stats.as_slice() {
        [x] => one_sample(x, mu)?,
        [x, y] => two_sample(x, y, mu)?,
        _ => return Err(wrong_group_count(groups.len())),
    };
    let p_value = t_p_value(statistic, df, alternative)?;
    debug!("t = {}, df = {}, p = {}", statistic, df, p_value);

    let samples = groups.iter().map(|g| g.values.as_slice()).collect::<Vec<_>>();
    let effect_size = effect::standardized_difference_or_nan(&samples, mu)?;

    Ok(TTestOutcome {
        statistic,
        df,
        p_value,
        effect_size,
        means: stats.iter().map(|s| s.mean).collect(),
        sizes: stats.iter().map(|s| s.count as f64).collect(),
    })
}

pub fn weighted(groups: &[SampleGroup], alternative: Alternative, mu: f64) -> Result<TTestOutcome> {
    check_sizes(groups)?;
    let stats = groups
        .iter()
        .map(|g| g.weighted_values().collect::<WeightedStats>())
        .collect::<Vec<_>>();
    if let Some((g, _)) = groups.iter().zip(&stats).find(|(_, s)| !(s.weight_sum > 0.)) {
        return Err(TestError::InsufficientData(format!(
            "the weights of group `{}` sum to zero",
            g.label
        )));
    }
    let (statistic, df) = match stats.as_slice() {
        [x] => one_sample(x, mu)?,
        [x, y] => two_sample(x, y, mu)?,
        _ => return Err(wrong_group_count(groups.len())),
    };
    let p_value = t_p_value(statistic, df, alternative)?;
    debug!("weighted t = {}, df = {}, p = {}", statistic, df, p_value);

    // The effect size is computed on weight-scaled values.  This is an
    // approximation, not a design-based estimator.
    let scaled = groups
        .iter()
        .map(|g| g.weighted_values().map(|(x, w)| x * w).collect::<Vec<f64>>())
        .collect::<Vec<_>>();
    let samples = scaled.iter().map(Vec::as_slice).collect::<Vec<_>>();
    let effect_size = effect::standardized_difference_or_nan(&samples, mu)?;

    Ok(TTestOutcome {
        statistic,
        df,
        p_value,
        effect_size,
        means: stats.iter().map(|s| s.mean).collect(),
        sizes: stats.iter().map(|s| s.weight_sum.round()).collect(),
    })
}
