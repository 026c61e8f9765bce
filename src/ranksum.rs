//! The Wilcoxon rank-sum (Mann-Whitney) test, with or without observation
//! weights.
//!
//! Without weights we report W, the permutation-standardized Z, and a
//! p-value which is exact for small untied samples and uses the normal
//! approximation (with continuity correction) otherwise.  With weights, the
//! ranks are computed on the weighted empirical CDF and tested with a
//! design-based variance, which only supports two-sided alternatives.

use crate::effect::{self, EffectSize};
use crate::error::{Result, TestError};
use crate::groups::SampleGroup;
use crate::request::Alternative;
use log::*;
use sample_stats::{normal_lower, normal_two_sided, normal_upper, student_t_two_sided};

/// Samples at least this large (or containing ties) use the normal
/// approximation
const EXACT_LIMIT: usize = 50;

#[derive(Clone, Debug, PartialEq)]
pub struct RankSumOutcome {
    /// The Wilcoxon W statistic (NaN for weighted tests)
    pub w: f64,
    pub z: f64,
    /// Mean rank score of group 1 minus that of group 2
    pub estimate: f64,
    pub p_value: f64,
    /// Degrees of freedom of the reference t distribution (NaN for
    /// unweighted tests, which use the normal or exact distribution)
    pub df: f64,
    pub effect_size: EffectSize,
    /// Per group: the mean of the within-group ranks
    pub rank_means: Vec<f64>,
    /// Per group: the observation count, or the rounded sum of the weights
    pub sizes: Vec<f64>,
    pub exact: bool,
}

/// Mid-ranks of `xs` (ties get the average of the ranks they span), and the
/// size of every group of tied values.
fn midranks(xs: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let mut order = (0..xs.len()).collect::<Vec<usize>>();
    order.sort_by(|&a, &b| xs[a].total_cmp(&xs[b]));
    let mut ranks = vec![0.; xs.len()];
    let mut ties = vec![];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && xs[order[end]] == xs[order[start]] {
            end += 1;
        }
        // positions start..end hold ranks start+1..=end
        let rank = (start + end + 1) as f64 / 2.;
        for &i in &order[start..end] {
            ranks[i] = rank;
        }
        ties.push(end - start);
        start = end;
    }
    (ranks, ties)
}

fn mean(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn two_groups(groups: &[SampleGroup]) -> Result<(&SampleGroup, &SampleGroup)> {
    match groups {
        [x, y] => {
            for g in [x, y] {
                if g.is_empty() {
                    return Err(TestError::InsufficientData(format!(
                        "group `{}` has no observations",
                        g.label
                    )));
                }
            }
            Ok((x, y))
        }
        _ => Err(TestError::Validation(format!(
            "the Mann-Whitney test needs exactly two groups, got {}",
            groups.len()
        ))),
    }
}

/// The null distribution of W for untied samples of size `m` and `n`.
struct WilcoxonDist {
    /// `counts[u]` is the number of rank assignments with W = u
    counts: Vec<f64>,
    total: f64,
}

impl WilcoxonDist {
    fn new(m: usize, n: usize) -> WilcoxonDist {
        // Count the size-m subsets of 1..=N by rank sum
        let big_n = m + n;
        let max_sum = (big_n - m + 1..=big_n).sum::<usize>();
        let mut by_sum = vec![vec![0.; max_sum + 1]; m + 1];
        by_sum[0][0] = 1.;
        for rank in 1..=big_n {
            for k in (1..=m.min(rank)).rev() {
                let (lo, hi) = by_sum.split_at_mut(k);
                let (prev, cur) = (&lo[k - 1], &mut hi[0]);
                for s in (rank..=max_sum).rev() {
                    cur[s] += prev[s - rank];
                }
            }
        }
        let min_sum = m * (m + 1) / 2;
        let counts = by_sum[m][min_sum..].to_vec();
        let total = counts.iter().sum();
        WilcoxonDist { counts, total }
    }

    /// P(W <= q)
    fn cdf(&self, q: f64) -> f64 {
        if q < 0. {
            return 0.;
        }
        let q = q.floor() as usize;
        let hits = self.counts.iter().take(q + 1).sum::<f64>();
        (hits / self.total).min(1.)
    }
}

pub fn unweighted(groups: &[SampleGroup], alternative: Alternative, mu: f64) -> Result<RankSumOutcome> {
    let (x, y) = two_groups(groups)?;
    let (n1, n2) = (x.len(), y.len());
    let big_n = n1 + n2;

    let pooled = x
        .values
        .iter()
        .map(|v| v - mu)
        .chain(y.values.iter().copied())
        .collect::<Vec<f64>>();
    let (ranks, ties) = midranks(&pooled);
    let r1 = ranks[..n1].iter().sum::<f64>();
    let w = r1 - (n1 * (n1 + 1)) as f64 / 2.;

    let tie_term = ties.iter().map(|&t| (t * t * t - t) as f64).sum::<f64>();
    let (n1f, n2f, nf) = (n1 as f64, n2 as f64, big_n as f64);
    let var = n1f * n2f / 12. * ((nf + 1.) - tie_term / (nf * (nf - 1.)));
    if !(var > 0.) {
        return Err(TestError::NumericDegeneracy(
            "all observations are tied".into(),
        ));
    }
    let sigma = var.sqrt();
    let z = (r1 - n1f * (nf + 1.) / 2.) / sigma;

    let exact = n1 < EXACT_LIMIT && n2 < EXACT_LIMIT && tie_term == 0.;
    let p_value = if exact {
        debug!("exact p-value for W = {} (n = {}, {})", w, n1, n2);
        let dist = WilcoxonDist::new(n1, n2);
        match alternative {
            Alternative::TwoSided => {
                let p = if w > n1f * n2f / 2. {
                    1. - dist.cdf(w - 1.)
                } else {
                    dist.cdf(w)
                };
                (2. * p).min(1.)
            }
            Alternative::Greater => 1. - dist.cdf(w - 1.),
            Alternative::Less => dist.cdf(w),
        }
    } else {
        debug!("normal approximation for W = {} (n = {}, {})", w, n1, n2);
        let centred = w - n1f * n2f / 2.;
        let correction = match alternative {
            Alternative::TwoSided if centred == 0. => 0.,
            Alternative::TwoSided => 0.5 * centred.signum(),
            Alternative::Greater => 0.5,
            Alternative::Less => -0.5,
        };
        let zc = (centred - correction) / sigma;
        match alternative {
            Alternative::TwoSided => normal_two_sided(zc),
            Alternative::Greater => normal_upper(zc),
            Alternative::Less => normal_lower(zc),
        }
    };

    let estimate = (mean(&ranks[..n1]) - mean(&ranks[n1..])) / nf;
    let rank_means = [x, y]
        .iter()
        .map(|g| mean(&midranks(&g.values).0))
        .collect();

    Ok(RankSumOutcome {
        w,
        z,
        estimate,
        p_value,
        df: f64::NAN,
        effect_size: effect::rank_biserial_r(z, nf),
        rank_means,
        sizes: vec![n1f, n2f],
        exact,
    })
}

/// Rank scores on the weighted empirical CDF: each observation gets the
/// weight below it plus half its own weight (averaged over ties), as a
/// share of the total weight.
fn weighted_rank_scores(xs: &[f64], ws: &[f64]) -> Vec<f64> {
    let mut order = (0..xs.len()).collect::<Vec<usize>>();
    order.sort_by(|&a, &b| xs[a].total_cmp(&xs[b]));
    let total = ws.iter().sum::<f64>();
    let mut scores = vec![0.; xs.len()];
    let mut cum = 0.;
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        let mut block = 0.;
        while end < order.len() && xs[order[end]] == xs[order[start]] {
            let i = order[end];
            cum += ws[i];
            block += cum - ws[i] / 2.;
            end += 1;
        }
        let score = block / (end - start) as f64 / total;
        for &i in &order[start..end] {
            scores[i] = score;
        }
        start = end;
    }
    scores
}

pub fn weighted(groups: &[SampleGroup], alternative: Alternative) -> Result<RankSumOutcome> {
    if alternative != Alternative::TwoSided {
        return Err(TestError::UnsupportedAlternative(alternative.to_string()));
    }
    let (x, y) = two_groups(groups)?;
    let n = x.len() + y.len();
    if n < 3 {
        return Err(TestError::InsufficientData(format!(
            "the weighted rank-sum test needs at least 3 observations, got {}",
            n
        )));
    }

    let (xs, xw): (Vec<f64>, Vec<f64>) = x.weighted_values().unzip();
    let (ys, yw): (Vec<f64>, Vec<f64>) = y.weighted_values().unzip();
    let pooled = xs.iter().chain(&ys).copied().collect::<Vec<f64>>();
    let weights = xw.iter().chain(&yw).copied().collect::<Vec<f64>>();
    let scores = weighted_rank_scores(&pooled, &weights);
    let (s1, s2) = scores.split_at(xs.len());

    let w1 = xw.iter().sum::<f64>();
    let w2 = yw.iter().sum::<f64>();
    if !(w1 > 0.) || !(w2 > 0.) {
        return Err(TestError::InsufficientData(
            "the weights of a group sum to zero".into(),
        ));
    }
    let weighted_mean = |s: &[f64], w: &[f64], total: f64| -> f64 {
        s.iter().zip(w).map(|(s, w)| s * w).sum::<f64>() / total
    };
    let m1 = weighted_mean(s1, &xw, w1);
    let m2 = weighted_mean(s2, &yw, w2);
    let estimate = m1 - m2;

    // With-replacement linearization variance of the difference in means
    let influence = |s: &[f64], w: &[f64], m: f64, total: f64| -> f64 {
        s.iter()
            .zip(w)
            .map(|(s, w)| (w * (s - m) / total).powi(2))
            .sum::<f64>()
    };
    let nf = n as f64;
    let var = nf / (nf - 1.) * (influence(s1, &xw, m1, w1) + influence(s2, &yw, m2, w2));
    if !(var > 0.) {
        return Err(TestError::NumericDegeneracy(
            "the rank scores have no variance".into(),
        ));
    }
    let z = estimate / var.sqrt();
    let df = nf - 2.;
    let p_value = student_t_two_sided(z, df)?;
    debug!("weighted rank-sum: estimate = {}, z = {}, p = {}", estimate, z, p_value);

    let rank_means = vec![
        weighted_mean(&midranks(&xs).0, &xw, w1),
        weighted_mean(&midranks(&ys).0, &yw, w2),
    ];
    let sizes = vec![w1.round(), w2.round()];
    let effect_size = effect::rank_biserial_r(z, sizes[0] + sizes[1]);

    Ok(RankSumOutcome {
        w: f64::NAN,
        z,
        estimate,
        p_value,
        df,
        effect_size,
        rank_means,
        sizes,
        exact: false,
    })
}
