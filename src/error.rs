use thiserror::Error;

/// Everything that can go wrong while running a test.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TestError {
    /// The request is malformed: missing or contradictory arguments, wrong
    /// column types, unknown columns.
    #[error("{0}")]
    Validation(String),

    #[error("Grouping variable `{column}` has {levels} groups, but exactly 2 are required. Use {alternative} for more than two groups.")]
    TooManyGroups {
        column: String,
        levels: usize,
        alternative: &'static str,
    },

    #[error("Weighted rank-sum tests only support two-sided alternatives (got `{0}`)")]
    UnsupportedAlternative(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Numeric degeneracy: {0}")]
    NumericDegeneracy(String),
}

impl From<sample_stats::Error> for TestError {
    fn from(e: sample_stats::Error) -> TestError {
        match e {
            sample_stats::Error::NotEnoughData => TestError::InsufficientData(e.to_string()),
            e => TestError::NumericDegeneracy(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TestError>;
