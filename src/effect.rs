//! Standardized effect sizes.
//!
//! Parametric tests report Cohen's d for large samples and Hedges' g (the
//! small-sample bias-corrected d) for small ones.  Rank tests report
//! r = |Z| / √N.

use crate::error::{Result, TestError};
use log::*;
use sample_stats::SampleStats;
use serde::Serialize;
use statrs::function::gamma::ln_gamma;
use std::fmt;

/// Samples with more observations than this get Cohen's d; the rest get
/// Hedges' g.
pub const LARGE_SAMPLE: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EffectSizeKind {
    CohensD,
    HedgesG,
    RankBiserialR,
}

impl fmt::Display for EffectSizeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            EffectSizeKind::CohensD => "Cohen's d",
            EffectSizeKind::HedgesG => "Hedges' g",
            EffectSizeKind::RankBiserialR => "r",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EffectSize {
    pub kind: EffectSizeKind,
    pub value: f64,
}

/// Cohen's d for one sample against `mu`, or for `xs[0] - xs[1]` against
/// `mu` using the pooled standard deviation.
pub fn cohens_d(samples: &[&[f64]], mu: f64) -> Result<f64> {
    let (diff, sd) = match samples {
        [x] => {
            let x = x.iter().copied().collect::<SampleStats>();
            (x.mean - mu, x.std_dev())
        }
        [x, y] => {
            let x = x.iter().copied().collect::<SampleStats>();
            let y = y.iter().copied().collect::<SampleStats>();
            let dof = (x.count + y.count).saturating_sub(2) as f64;
            let pooled_var =
                ((x.count as f64 - 1.) * x.var + (y.count as f64 - 1.) * y.var) / dof;
            (x.mean - y.mean - mu, pooled_var.sqrt())
        }
        _ => {
            return Err(TestError::Validation(format!(
                "effect sizes need one or two samples, got {}",
                samples.len()
            )))
        }
    };
    if !sd.is_finite() || sd <= 0. {
        return Err(TestError::NumericDegeneracy(format!(
            "standard deviation is {}",
            sd
        )));
    }
    Ok(diff / sd)
}

/// The exact small-sample correction factor J(ν) = Γ(ν/2) / (√(ν/2) Γ((ν-1)/2)).
///
/// J(1) is 0, the limit as Γ((ν-1)/2) diverges.
fn hedges_correction(dof: f64) -> Result<f64> {
    if dof == 1. {
        return Ok(0.);
    }
    if !(dof > 1.) {
        return Err(TestError::NumericDegeneracy(format!(
            "Hedges' correction needs at least 1 degree of freedom (got {})",
            dof
        )));
    }
    Ok((ln_gamma(dof / 2.) - (dof / 2.).sqrt().ln() - ln_gamma((dof - 1.) / 2.)).exp())
}

pub fn hedges_g(samples: &[&[f64]], mu: f64) -> Result<f64> {
    let d = cohens_d(samples, mu)?;
    let n = samples.iter().map(|x| x.len()).sum::<usize>();
    let dof = n as f64 - samples.len() as f64;
    Ok(d * hedges_correction(dof)?)
}

/// Pick Cohen's d or Hedges' g by total sample size.
pub fn standardized_difference(samples: &[&[f64]], mu: f64) -> Result<EffectSize> {
    let n = samples.iter().map(|x| x.len()).sum::<usize>();
    if n > LARGE_SAMPLE {
        debug!("n = {} > {}: using Cohen's d", n, LARGE_SAMPLE);
        Ok(EffectSize {
            kind: EffectSizeKind::CohensD,
            value: cohens_d(samples, mu)?,
        })
    } else {
        debug!("n = {} <= {}: using Hedges' g", n, LARGE_SAMPLE);
        Ok(EffectSize {
            kind: EffectSizeKind::HedgesG,
            value: hedges_g(samples, mu)?,
        })
    }
}

/// Like [`standardized_difference`], but a degenerate effect size becomes
/// NaN instead of an error.
pub fn standardized_difference_or_nan(samples: &[&[f64]], mu: f64) -> Result<EffectSize> {
    match standardized_difference(samples, mu) {
        Err(TestError::NumericDegeneracy(msg)) => {
            warn!("Effect size is undefined: {}", msg);
            let n = samples.iter().map(|x| x.len()).sum::<usize>();
            Ok(EffectSize {
                kind: if n > LARGE_SAMPLE {
                    EffectSizeKind::CohensD
                } else {
                    EffectSizeKind::HedgesG
                },
                value: f64::NAN,
            })
        }
        x => x,
    }
}

/// r = |Z| / √N.  NaN when N isn't positive, which happens when weights
/// round to a total of 0.
pub fn rank_biserial_r(z: f64, n: f64) -> EffectSize {
    let value = if n > 0. {
        (z / n.sqrt()).abs()
    } else {
        warn!("Effect size is undefined: sample size is {}", n);
        f64::NAN
    };
    EffectSize {
        kind: EffectSizeKind::RankBiserialR,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    const G1: [f64; 5] = [1., 2., 3., 4., 5.];
    const G2: [f64; 5] = [6., 7., 8., 9., 10.];

    #[test]
    fn two_sample_d() {
        // pooled sd = √2.5
        let d = cohens_d(&[&G1, &G2], 0.).unwrap();
        assert_relative_eq!(d, -5. / 2.5_f64.sqrt(), max_relative = 1e-12);
        let d_swapped = cohens_d(&[&G2, &G1], 0.).unwrap();
        assert_relative_eq!(d, -d_swapped, max_relative = 1e-12);
    }

    #[test]
    fn one_sample_d() {
        let d = cohens_d(&[&G1], 1.).unwrap();
        assert_relative_eq!(d, 2. / 2.5_f64.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn correction_factor() {
        // Γ(4) / (2 Γ(3.5)) on 8 degrees of freedom
        assert_relative_eq!(hedges_correction(8.).unwrap(), 0.902703, max_relative = 1e-5);
        // close to the 1 - 3/(4ν - 1) approximation for large ν
        assert_relative_eq!(
            hedges_correction(100.).unwrap(),
            1. - 3. / 399.,
            max_relative = 1e-5
        );
        assert_eq!(hedges_correction(1.).unwrap(), 0.);
        assert!(hedges_correction(0.5).is_err());
    }

    #[test]
    fn two_observation_one_sample_g() {
        let es = standardized_difference_or_nan(&[&[1., 3.]], 0.).unwrap();
        assert_eq!(es.kind, EffectSizeKind::HedgesG);
        assert_eq!(es.value, 0.);
    }

    #[test]
    fn two_sample_g() {
        let g = hedges_g(&[&G1, &G2], 0.).unwrap();
        assert_relative_eq!(g, -2.854599, max_relative = 1e-5);
    }

    #[test]
    fn threshold() {
        let ten = (0..10).map(f64::from).collect::<Vec<_>>();
        let eleven = (0..11).map(|x| f64::from(x) * 1.5).collect::<Vec<_>>();
        let es = standardized_difference(&[&ten, &ten], 0.).unwrap();
        assert_eq!(es.kind, EffectSizeKind::HedgesG);
        let es = standardized_difference(&[&ten, &eleven], 0.).unwrap();
        assert_eq!(es.kind, EffectSizeKind::CohensD);
        let twenty = (0..20).map(f64::from).collect::<Vec<_>>();
        let twenty_one = (0..21).map(f64::from).collect::<Vec<_>>();
        assert_eq!(
            standardized_difference(&[&twenty], 0.).unwrap().kind,
            EffectSizeKind::HedgesG
        );
        assert_eq!(
            standardized_difference(&[&twenty_one], 0.).unwrap().kind,
            EffectSizeKind::CohensD
        );
    }

    #[test]
    fn constant_data_degrades_to_nan() {
        let flat = [3., 3., 3.];
        assert!(matches!(
            cohens_d(&[&flat], 0.),
            Err(TestError::NumericDegeneracy(_))
        ));
        let es = standardized_difference_or_nan(&[&flat], 0.).unwrap();
        assert_eq!(es.kind, EffectSizeKind::HedgesG);
        assert!(es.value.is_nan());
    }

    #[test]
    fn r() {
        let es = rank_biserial_r(-2.611165, 10.);
        assert_eq!(es.kind, EffectSizeKind::RankBiserialR);
        assert_relative_eq!(es.value, 2.611165 / 10_f64.sqrt());
        assert!(rank_biserial_r(-1.2, 0.).value.is_nan());
    }
}
