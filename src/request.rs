use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Which family of test is being run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TestKind {
    TTest,
    RankSum,
}

impl TestKind {
    pub fn name(self) -> &'static str {
        match self {
            TestKind::TTest => "t-test",
            TestKind::RankSum => "Mann-Whitney test",
        }
    }

    /// What to use instead when there are more than two groups
    pub fn multi_group_alternative(self) -> &'static str {
        match self {
            TestKind::TTest => "a one-way ANOVA",
            TestKind::RankSum => "the Kruskal-Wallis test",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alternative {
    #[default]
    TwoSided,
    Less,
    Greater,
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Alternative::TwoSided => "two-sided",
            Alternative::Less => "less",
            Alternative::Greater => "greater",
        })
    }
}

impl FromStr for Alternative {
    type Err = String;
    fn from_str(x: &str) -> Result<Alternative, String> {
        match x {
            "two-sided" | "two.sided" | "two_sided" => Ok(Alternative::TwoSided),
            "less" => Ok(Alternative::Less),
            "greater" => Ok(Alternative::Greater),
            x => Err(format!(
                "unknown alternative \"{}\" (expected two-sided, less or greater)",
                x
            )),
        }
    }
}

/// The arguments of a single test.
///
/// Either `select` names two columns to compare, or it names one column and
/// `by` names a grouping column with two levels.  A single column without
/// `by` is a one-sample test.
#[derive(Clone, Debug, PartialEq)]
pub struct TestRequest {
    pub select: Vec<String>,
    pub by: Option<String>,
    pub weights: Option<String>,
    pub alternative: Alternative,
    /// The value of the difference (or of the mean, for one-sample tests)
    /// under the null hypothesis
    pub mu: f64,
    pub paired: bool,
}

impl Default for TestRequest {
    fn default() -> Self {
        Self {
            select: vec![],
            by: None,
            weights: None,
            alternative: Alternative::TwoSided,
            mu: 0.0,
            paired: false,
        }
    }
}

impl TestRequest {
    pub fn new<S: Into<String>>(select: impl IntoIterator<Item = S>) -> TestRequest {
        TestRequest {
            select: select.into_iter().map(Into::into).collect(),
            ..TestRequest::default()
        }
    }

    pub fn by(mut self, column: impl Into<String>) -> TestRequest {
        self.by = Some(column.into());
        self
    }

    pub fn weights(mut self, column: impl Into<String>) -> TestRequest {
        self.weights = Some(column.into());
        self
    }

    pub fn alternative(mut self, alternative: Alternative) -> TestRequest {
        self.alternative = alternative;
        self
    }

    pub fn mu(mut self, mu: f64) -> TestRequest {
        self.mu = mu;
        self
    }

    pub fn paired(mut self, paired: bool) -> TestRequest {
        self.paired = paired;
        self
    }

    /// Every column the request reads from, in a stable order
    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.select
            .iter()
            .chain(self.by.iter())
            .chain(self.weights.iter())
            .map(String::as_str)
    }

    pub fn is_weighted(&self) -> bool {
        self.weights.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder() {
        let req = TestRequest::new(["score"])
            .by("sex")
            .weights("w")
            .mu(1.5)
            .alternative(Alternative::Less);
        assert_eq!(req.select, vec!["score"]);
        assert_eq!(req.columns().collect::<Vec<_>>(), vec!["score", "sex", "w"]);
        assert!(req.is_weighted());
        assert!(!req.paired);
        assert_eq!(req.mu, 1.5);
    }

    #[test]
    fn parse_alternative() {
        assert_eq!("two.sided".parse::<Alternative>(), Ok(Alternative::TwoSided));
        assert_eq!("greater".parse::<Alternative>(), Ok(Alternative::Greater));
        assert!("bigger".parse::<Alternative>().is_err());
        assert_eq!(Alternative::Less.to_string(), "less");
    }
}
