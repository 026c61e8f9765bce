//! Two-group significance tests with effect sizes.
//!
//! [`t_test`] and [`mann_whitney_test`] take a [`Dataset`] and a
//! [`TestRequest`] naming the columns to test.  Both handle one-sample
//! (t-test only), paired (t-test only) and two-sample designs, with or
//! without observation weights, and return a [`TestResult`] which carries
//! the statistic, p-value and effect size along with per-group summaries.
//!
//! ```
//! use sigtest::{t_test, Dataset, TestRequest};
//!
//! let data = Dataset::new()
//!     .with_numeric("a", vec![1., 2., 3., 4., 5.])
//!     .with_numeric("b", vec![6., 7., 8., 9., 10.]);
//! let res = t_test(&data, &TestRequest::new(["a", "b"])).unwrap();
//! assert!((res.statistic + 5.).abs() < 1e-9);
//! assert_eq!(res.effect_size.kind.to_string(), "Hedges' g");
//! ```

pub mod data;
pub mod effect;
mod engine;
pub mod error;
pub mod groups;
pub mod label;
pub mod normalize;
pub mod ranksum;
pub mod report;
pub mod request;
pub mod result;
pub mod ttest;
pub mod validate;

pub use data::{Column, Dataset, Factor, Variable};
pub use effect::{EffectSize, EffectSizeKind};
pub use engine::{mann_whitney_test, t_test};
pub use error::{Result, TestError};
pub use label::Label;
pub use request::{Alternative, TestKind, TestRequest};
pub use result::{GroupSummary, TestResult};
