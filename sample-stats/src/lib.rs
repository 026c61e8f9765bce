/*! Sample moments and the tail probabilities needed to turn them into
significance tests.

## Example

Suppose we have a sample from a population `X` and another from `Y` (both
normal, possibly with different variances) and want to know whether their
means differ.

```
# use sample_stats::*;
let x = vec![1., 2., 3., 4., 5.].into_iter().collect::<SampleStats>();
let y = vec![6., 7., 8., 9., 10.].into_iter().collect::<SampleStats>();
let se = (x.mean_var() + y.mean_var()).sqrt();
let t = (x.mean - y.mean) / se;
let dof = welch_dof(&x, &y).unwrap();
assert_eq!(t, -5.);
assert_eq!(dof, 8.);
assert!(student_t_two_sided(t, dof).unwrap() < 0.001);
```

*/

mod dist;
mod stats;

pub use dist::*;
pub use stats::*;

/// The first two moments of a sample, as far as a t-test is concerned.
pub trait Moments {
    fn count(&self) -> usize;
    fn mean(&self) -> f64;
    /// The squared standard error of the mean.
    fn mean_var(&self) -> f64;
}

impl Moments for SampleStats {
    fn count(&self) -> usize {
        self.count
    }
    fn mean(&self) -> f64 {
        self.mean
    }
    fn mean_var(&self) -> f64 {
        SampleStats::mean_var(*self)
    }
}

impl Moments for WeightedStats {
    fn count(&self) -> usize {
        self.count
    }
    fn mean(&self) -> f64 {
        self.mean
    }
    fn mean_var(&self) -> f64 {
        WeightedStats::mean_var(*self)
    }
}

/// Degrees of freedom for `x.mean - y.mean`.
///
/// The degrees of freedom for s² is n-1.  To compute the pooled degrees
/// of freedom of the linear combination s²_x/n_x + s²_y/n_y, we use
/// the Welch–Satterthwaite equation:
///
/// ```text
/// v = (se²_x + se²_y)² / (se⁴_x/(n_x-1) + se⁴_y/(n_y-1))
/// ```
pub fn welch_dof(x: &impl Moments, y: &impl Moments) -> Result<f64, Error> {
    // Prevent division by zero
    if x.count() < 2 || y.count() < 2 {
        return Err(Error::NotEnoughData);
    }
    let x_mean_var = x.mean_var();
    let y_mean_var = y.mean_var();
    if !x_mean_var.is_finite() || !y_mean_var.is_finite() {
        return Err(Error::InfiniteVariance);
    }
    let var_delta = x_mean_var + y_mean_var;
    if var_delta == 0. {
        return Err(Error::ZeroVariance);
    }
    let k_x = x_mean_var * x_mean_var / (x.count() - 1) as f64;
    let k_y = y_mean_var * y_mean_var / (y.count() - 1) as f64;
    Ok(var_delta * (var_delta / (k_x + k_y)))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    NotEnoughData,
    InfiniteVariance,
    ZeroVariance,
    BadDegreesOfFreedom(f64),
}

use std::fmt;
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::NotEnoughData => f.write_str("sample size is less than 2"),
            Error::InfiniteVariance => {
                f.write_str("The variance of one of the samples is infinite")
            }
            Error::ZeroVariance => f.write_str("The variance of the samples is zero"),
            Error::BadDegreesOfFreedom(v) => write!(f, "invalid degrees of freedom: {}", v),
        }
    }
}
impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    fn stats(count: usize, mean: f64, var: f64) -> SampleStats {
        SampleStats { count, mean, var }
    }

    #[test]
    fn onlinestatbook() {
        // From http://onlinestatbook.com/2/estimation/difference_means.html
        let females = stats(17, 5.353, 2.743);
        let males = stats(17, 3.882, 2.985);
        assert_relative_eq!(
            welch_dof(&males, &females).unwrap(),
            31.773948759590525,
            max_relative = 1e-12
        );
    }

    #[test]
    fn equal_variances_give_pooled_dof() {
        // From Zar (1984) page 132, with equal sizes
        let x = stats(6, 10., 0.7206_f64.powi(2));
        let y = stats(6, 15., 0.7206_f64.powi(2));
        assert_relative_eq!(welch_dof(&x, &y).unwrap(), 10., max_relative = 1e-12);
    }

    #[test]
    fn weighted_moments_plug_in() {
        let x = WeightedStats::new(&[1., 2., 3., 4., 5.], &[1.; 5]);
        let y = WeightedStats::new(&[6., 7., 8., 9., 10.], &[1.; 5]);
        assert_relative_eq!(welch_dof(&x, &y).unwrap(), 8., max_relative = 1e-12);
    }

    #[test]
    fn degenerate() {
        assert_eq!(
            welch_dof(&stats(1, 0., f64::NAN), &stats(5, 0., 1.)),
            Err(Error::NotEnoughData)
        );
        assert_eq!(
            welch_dof(&stats(3, 0., 0.), &stats(3, 1., 0.)),
            Err(Error::ZeroVariance)
        );
        assert_eq!(
            welch_dof(&stats(3, 0., f64::INFINITY), &stats(3, 1., 1.)),
            Err(Error::InfiniteVariance)
        );
    }
}
