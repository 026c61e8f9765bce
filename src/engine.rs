//! The two entry points.  Each runs the same pipeline: validate the
//! request, normalize the data into long form, split it into groups, run
//! the matching calculator and assemble the result.

use crate::data::Dataset;
use crate::error::{Result, TestError};
use crate::groups;
use crate::normalize::normalize;
use crate::ranksum;
use crate::request::{Alternative, TestKind, TestRequest};
use crate::result::{self, Context, TestResult};
use crate::ttest;
use crate::validate::validate;
use log::*;

fn context(req: &TestRequest) -> Context {
    Context {
        alternative: req.alternative,
        mu: req.mu,
        weighted: req.is_weighted(),
        paired: req.paired,
    }
}

/// Student's t-test.
///
/// With one column and no `by`, tests the mean against `mu`.  With
/// `paired`, tests the mean of the differences of the two selected columns
/// against `mu`.  Otherwise runs Welch's test on the two groups, with
/// Group 1 the first selected column (or the first level of `by`).
pub fn t_test(data: &Dataset, req: &TestRequest) -> Result<TestResult> {
    validate(data, req, TestKind::TTest)?;
    let norm = normalize(data, req)?;
    let groups = groups::resolve(norm, TestKind::TTest)?;
    debug!(
        "t-test on {} group(s), weighted = {}",
        groups.len(),
        req.is_weighted()
    );
    let out = if req.is_weighted() {
        ttest::weighted(&groups, req.alternative, req.mu)?
    } else {
        ttest::unweighted(&groups, req.alternative, req.mu)?
    };
    Ok(result::from_t_test(&groups, out, context(req)))
}

/// The Wilcoxon rank-sum (Mann-Whitney U) test of two independent groups.
///
/// Weighted tests only support two-sided alternatives and ignore `mu`.
pub fn mann_whitney_test(data: &Dataset, req: &TestRequest) -> Result<TestResult> {
    validate(data, req, TestKind::RankSum)?;
    if req.is_weighted() && req.alternative != Alternative::TwoSided {
        return Err(TestError::UnsupportedAlternative(req.alternative.to_string()));
    }
    if req.is_weighted() && req.mu != 0. {
        warn!("mu = {} is ignored by the weighted rank-sum test", req.mu);
    }
    let norm = normalize(data, req)?;
    let groups = groups::resolve(norm, TestKind::RankSum)?;
    let out = if req.is_weighted() {
        ranksum::weighted(&groups, req.alternative)?
    } else {
        ranksum::unweighted(&groups, req.alternative, req.mu)?
    };
    Ok(result::from_rank_sum(&groups, out, context(req)))
}
