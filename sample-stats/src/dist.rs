use crate::Error;
use statrs::distribution::{ContinuousCDF, StudentsT};
use statrs::function::erf::erfc;
use std::f64::consts::SQRT_2;

fn students_t(dof: f64) -> Result<StudentsT, Error> {
    if !(dof > 0.) {
        return Err(Error::BadDegreesOfFreedom(dof));
    }
    StudentsT::new(0., 1., dof).map_err(|_| Error::BadDegreesOfFreedom(dof))
}

/// The CDF of Student's t-distribution with `dof` degrees of freedom
/// (which may be fractional).
pub fn student_t_cdf(t: f64, dof: f64) -> Result<f64, Error> {
    Ok(students_t(dof)?.cdf(t))
}

/// P(T <= t)
pub fn student_t_lower(t: f64, dof: f64) -> Result<f64, Error> {
    student_t_cdf(t, dof)
}

/// P(T >= t)
pub fn student_t_upper(t: f64, dof: f64) -> Result<f64, Error> {
    Ok(students_t(dof)?.sf(t))
}

/// P(|T| >= |t|)
pub fn student_t_two_sided(t: f64, dof: f64) -> Result<f64, Error> {
    Ok((2. * students_t(dof)?.cdf(-t.abs())).min(1.))
}

/// P(Z <= z) for a standard normal Z
pub fn normal_lower(z: f64) -> f64 {
    0.5 * erfc(-z / SQRT_2)
}

/// P(Z >= z) for a standard normal Z
pub fn normal_upper(z: f64) -> f64 {
    0.5 * erfc(z / SQRT_2)
}

/// P(|Z| >= |z|) for a standard normal Z
pub fn normal_two_sided(z: f64) -> f64 {
    erfc(z.abs() / SQRT_2).min(1.)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    #[test]
    fn t_table() {
        // One-sided upper critical values from the t-table at
        // https://en.wikipedia.org/wiki/Student's_t-distribution
        macro_rules! assert_upper {
            ($t:expr, $dof:expr, $p:expr) => {
                assert_relative_eq!(student_t_upper($t, $dof).unwrap(), $p, max_relative = 0.01);
            };
        }
        assert_upper!(6.314, 1., 0.05);
        assert_upper!(12.71, 1., 0.025);
        assert_upper!(2.920, 2., 0.05);
        assert_upper!(4.303, 2., 0.025);
        assert_upper!(2.353, 3., 0.05);
        assert_upper!(2.776, 4., 0.025);
        assert_upper!(2.228, 10., 0.025);
        assert_upper!(1.725, 20., 0.05);
        assert_upper!(2.042, 30., 0.025);
    }

    #[test]
    fn symmetry() {
        for &(t, dof) in &[(0.3, 3.), (-1.7, 7.5), (2.5, 31.77)] {
            let lo = student_t_lower(t, dof).unwrap();
            let hi = student_t_upper(t, dof).unwrap();
            assert_relative_eq!(lo + hi, 1., max_relative = 1e-12);
            let two = student_t_two_sided(t, dof).unwrap();
            assert_relative_eq!(two, 2. * lo.min(hi), max_relative = 1e-9);
        }
        assert_relative_eq!(student_t_cdf(0., 4.).unwrap(), 0.5, max_relative = 1e-12);
    }

    #[test]
    fn five_sigma() {
        // t = -5 on 8 degrees of freedom
        let p = student_t_two_sided(-5., 8.).unwrap();
        assert_relative_eq!(p, 0.00105283, max_relative = 1e-4);
    }

    #[test]
    fn normal() {
        assert_relative_eq!(normal_upper(1.959964), 0.025, max_relative = 1e-5);
        assert_relative_eq!(normal_lower(-1.644854), 0.05, max_relative = 1e-5);
        assert_relative_eq!(normal_two_sided(-2.575829), 0.01, max_relative = 1e-5);
    }

    #[test]
    fn bad_dof() {
        assert_eq!(student_t_cdf(1., 0.), Err(Error::BadDegreesOfFreedom(0.)));
        assert!(student_t_two_sided(1., f64::NAN).is_err());
    }
}
