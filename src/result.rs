//! The record returned by every test.

use crate::effect::EffectSize;
use crate::groups::SampleGroup;
use crate::label::{self, Label};
use crate::ranksum::RankSumOutcome;
use crate::request::{Alternative, TestKind};
use crate::ttest::TTestOutcome;
use serde::Serialize;

/// Descriptive statistics of one group.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupSummary {
    /// Padded to the width of the widest label in the result
    pub label: Label,
    /// Observation count, or the rounded sum of the weights
    pub n: f64,
    /// The mean for t-tests; the mean within-group rank for rank tests
    pub mean: f64,
}

/// The outcome of a single test.
///
/// Every test produces the same set of fields.  Fields which don't apply to
/// a test are NaN (`z` and `estimate` for t-tests, `df` for unweighted
/// rank tests).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TestResult {
    pub kind: TestKind,
    pub method: String,
    pub statistic_name: &'static str,
    pub statistic: f64,
    pub df: f64,
    pub p_value: f64,
    pub effect_size: EffectSize,
    pub alternative: Alternative,
    pub null_value: f64,
    pub z: f64,
    pub estimate: f64,
    pub groups: Vec<GroupSummary>,
    pub weighted: bool,
    pub paired: bool,
    pub one_sample: bool,
}

impl TestResult {
    pub fn group_labels(&self) -> impl Iterator<Item = &Label> {
        self.groups.iter().map(|g| &g.label)
    }
}

/// The request-level facts a result records alongside the numbers.
#[derive(Clone, Copy, Debug)]
pub struct Context {
    pub alternative: Alternative,
    pub mu: f64,
    pub weighted: bool,
    pub paired: bool,
}

fn summarize(groups: &[SampleGroup], sizes: &[f64], means: &[f64]) -> Vec<GroupSummary> {
    label::equal_width(groups.iter().map(|g| g.label.clone()))
        .into_iter()
        .zip(sizes)
        .zip(means)
        .map(|((label, &n), &mean)| GroupSummary { label, n, mean })
        .collect()
}

fn suffix(weighted: bool) -> &'static str {
    if weighted {
        " (weighted)"
    } else {
        ""
    }
}

pub fn from_t_test(groups: &[SampleGroup], out: TTestOutcome, ctx: Context) -> TestResult {
    let one_sample = groups.len() == 1 && !ctx.paired;
    let method = if ctx.paired {
        "Paired t-test"
    } else if one_sample {
        "One Sample t-test"
    } else {
        "Welch Two Sample t-test"
    };
    TestResult {
        kind: TestKind::TTest,
        method: format!("{}{}", method, suffix(ctx.weighted)),
        statistic_name: "t",
        statistic: out.statistic,
        df: out.df,
        p_value: out.p_value,
        effect_size: out.effect_size,
        alternative: ctx.alternative,
        null_value: ctx.mu,
        z: f64::NAN,
        estimate: f64::NAN,
        groups: summarize(groups, &out.sizes, &out.means),
        weighted: ctx.weighted,
        paired: ctx.paired,
        one_sample,
    }
}

pub fn from_rank_sum(groups: &[SampleGroup], out: RankSumOutcome, ctx: Context) -> TestResult {
    let method = if out.exact {
        "Wilcoxon rank sum exact test"
    } else if ctx.weighted {
        "Wilcoxon rank sum test"
    } else {
        "Wilcoxon rank sum test with continuity correction"
    };
    let (statistic_name, statistic) = if ctx.weighted {
        ("Z", out.z)
    } else {
        ("W", out.w)
    };
    TestResult {
        kind: TestKind::RankSum,
        method: format!("{}{}", method, suffix(ctx.weighted)),
        statistic_name,
        statistic,
        df: out.df,
        p_value: out.p_value,
        effect_size: out.effect_size,
        alternative: ctx.alternative,
        null_value: ctx.mu,
        z: out.z,
        estimate: out.estimate,
        groups: summarize(groups, &out.sizes, &out.rank_means),
        weighted: ctx.weighted,
        paired: false,
        one_sample: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectSizeKind;

    fn groups() -> Vec<SampleGroup> {
        ["male", "female"]
            .iter()
            .map(|l| SampleGroup {
                label: l.to_string(),
                values: vec![1., 2.],
                weights: None,
            })
            .collect()
    }

    fn ctx(weighted: bool) -> Context {
        Context {
            alternative: Alternative::TwoSided,
            mu: 0.,
            weighted,
            paired: false,
        }
    }

    #[test]
    fn t_test_record() {
        let out = TTestOutcome {
            statistic: -5.,
            df: 8.,
            p_value: 0.001,
            effect_size: EffectSize {
                kind: EffectSizeKind::HedgesG,
                value: -2.85,
            },
            means: vec![3., 8.],
            sizes: vec![5., 5.],
        };
        let res = from_t_test(&groups(), out, ctx(true));
        assert_eq!(res.kind, TestKind::TTest);
        assert_eq!(res.method, "Welch Two Sample t-test (weighted)");
        assert_eq!(res.statistic_name, "t");
        assert!(res.z.is_nan() && res.estimate.is_nan());
        assert_eq!(
            res.group_labels().map(|l| l.0.as_str()).collect::<Vec<_>>(),
            vec!["male  ", "female"]
        );
        assert_eq!(res.groups[1].mean, 8.);
        assert!(res.weighted && !res.paired && !res.one_sample);
    }

    #[test]
    fn rank_sum_record() {
        let out = RankSumOutcome {
            w: 0.,
            z: -2.6,
            estimate: -0.5,
            p_value: 0.008,
            df: f64::NAN,
            effect_size: EffectSize {
                kind: EffectSizeKind::RankBiserialR,
                value: 0.82,
            },
            rank_means: vec![3., 3.],
            sizes: vec![5., 5.],
            exact: true,
        };
        let res = from_rank_sum(&groups(), out, ctx(false));
        assert_eq!(res.kind, TestKind::RankSum);
        assert_eq!(res.method, "Wilcoxon rank sum exact test");
        assert_eq!(res.statistic_name, "W");
        assert_eq!(res.statistic, 0.);
        assert_eq!(res.z, -2.6);
        assert!(res.df.is_nan());
    }
}
