use std::iter::FromIterator;

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct StatsBuilder {
    /// the number of samples seen so far
    count: usize,
    /// the mean of the entire dataset
    mean: f64,
    /// the squared distance from the mean
    m2: f64,
}

impl StatsBuilder {
    pub fn update(&mut self, x: f64) {
        // Welford's online algorithm
        self.count += 1;
        let delta1 = x - self.mean; // diff from the old mean
        self.mean += delta1 / self.count as f64;
        let delta2 = x - self.mean; // diff from the new mean
        self.m2 += delta1 * delta2;
    }

    pub fn count(self) -> usize {
        self.count
    }

    pub fn mean(self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.mean
        }
    }

    pub fn sample_var(self) -> f64 {
        if self.count <= 1 {
            f64::NAN
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }
}

impl Extend<f64> for StatsBuilder {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        for x in iter {
            self.update(x);
        }
    }
}

/// Sample statistics.
///
/// Assumed to be taken from a normally-distributed population.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleStats {
    /// The sample size
    pub count: usize,
    /// The sample mean
    pub mean: f64,
    /// The sample variance
    pub var: f64,
}

impl From<StatsBuilder> for SampleStats {
    fn from(x: StatsBuilder) -> SampleStats {
        SampleStats {
            count: x.count(),
            mean: x.mean(),
            var: x.sample_var(),
        }
    }
}

impl FromIterator<f64> for SampleStats {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> SampleStats {
        let mut bldr = StatsBuilder::default();
        bldr.extend(iter);
        bldr.into()
    }
}

impl SampleStats {
    /// An estimate of the variance of `mean` (which is an estimate of the
    /// population mean).
    ///
    /// When estimating μ with a sample mean ̄x, the variance of this
    /// estimate is σ²/n, where n is the size of the sample.  Since we also
    /// don't know σ², we have to estimate the variance of the estimated
    /// mean by s²/n.
    pub fn mean_var(self) -> f64 {
        self.var / self.count as f64
    }

    pub fn std_dev(self) -> f64 {
        self.var.sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct WeightedStatsBuilder {
    /// the number of samples seen so far
    count: usize,
    /// the sum of the weights
    w_sum: f64,
    /// the sum of the squared weights
    w2_sum: f64,
    /// the weighted mean
    mean: f64,
    /// the weighted squared distance from the mean
    s: f64,
}

impl WeightedStatsBuilder {
    pub fn update(&mut self, x: f64, w: f64) {
        // West's weighted variant of Welford
        self.count += 1;
        if w == 0. {
            return;
        }
        self.w_sum += w;
        self.w2_sum += w * w;
        let delta1 = x - self.mean;
        self.mean += (w / self.w_sum) * delta1;
        let delta2 = x - self.mean;
        self.s += w * delta1 * delta2;
    }

    pub fn count(self) -> usize {
        self.count
    }

    pub fn weight_sum(self) -> f64 {
        self.w_sum
    }

    pub fn mean(self) -> f64 {
        if self.w_sum == 0. {
            f64::NAN
        } else {
            self.mean
        }
    }

    /// The variance under reliability weights.  For uniform weights this is
    /// the ordinary sample variance.
    pub fn sample_var(self) -> f64 {
        let denom = self.w_sum - self.w2_sum / self.w_sum;
        if self.count <= 1 || !(denom > 0.) {
            f64::NAN
        } else {
            self.s / denom
        }
    }
}

impl Extend<(f64, f64)> for WeightedStatsBuilder {
    fn extend<T: IntoIterator<Item = (f64, f64)>>(&mut self, iter: T) {
        for (x, w) in iter {
            self.update(x, w);
        }
    }
}

/// Weighted sample statistics.
///
/// `count` is the number of observations, not the sum of the weights.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedStats {
    /// The number of observations
    pub count: usize,
    /// The sum of the weights
    pub weight_sum: f64,
    /// The weighted mean
    pub mean: f64,
    /// The weighted sample variance
    pub var: f64,
}

impl From<WeightedStatsBuilder> for WeightedStats {
    fn from(x: WeightedStatsBuilder) -> WeightedStats {
        WeightedStats {
            count: x.count(),
            weight_sum: x.weight_sum(),
            mean: x.mean(),
            var: x.sample_var(),
        }
    }
}

impl FromIterator<(f64, f64)> for WeightedStats {
    fn from_iter<T: IntoIterator<Item = (f64, f64)>>(iter: T) -> WeightedStats {
        let mut bldr = WeightedStatsBuilder::default();
        bldr.extend(iter);
        bldr.into()
    }
}

impl WeightedStats {
    pub fn new(values: &[f64], weights: &[f64]) -> WeightedStats {
        values.iter().copied().zip(weights.iter().copied()).collect()
    }

    /// The squared standard error of the weighted mean, using the raw
    /// observation count.
    pub fn mean_var(self) -> f64 {
        self.var / self.count as f64
    }

    pub fn std_dev(self) -> f64 {
        self.var.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::*;

    #[test]
    fn unweighted() {
        let stats = vec![1.0_f64, 2., 3.].into_iter().collect::<SampleStats>();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, 2.);
        assert_eq!(stats.var, 1.);

        let stats = vec![0.0_f64, -2., 2.].into_iter().collect::<SampleStats>();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, 0.);
        assert_eq!(stats.var, 4.);

        let stats = (0..=100).map(f64::from).collect::<SampleStats>();
        assert_eq!(stats.count, 101);
        assert_eq!(stats.mean, 50.);
        assert_eq!(stats.var, 858.5);
    }

    #[test]
    fn too_few() {
        let stats = vec![4.0_f64].into_iter().collect::<SampleStats>();
        assert_eq!(stats.mean, 4.);
        assert!(stats.var.is_nan());

        let stats = WeightedStats::new(&[4.], &[2.]);
        assert_eq!(stats.mean, 4.);
        assert!(stats.var.is_nan());
    }

    #[test]
    fn uniform_weights_match_unweighted() {
        let xs = [5.25, 4.69, 4.87, 4.94, 5.87, 5.66, 5.76, 5.33, 6.63, 6.68];
        let plain = xs.iter().copied().collect::<SampleStats>();
        for w in [1., 0.5, 3.] {
            let weighted = WeightedStats::new(&xs, &[w; 10]);
            assert_eq!(weighted.count, 10);
            assert_relative_eq!(weighted.weight_sum, 10. * w);
            assert_relative_eq!(weighted.mean, plain.mean, max_relative = 1e-12);
            assert_relative_eq!(weighted.var, plain.var, max_relative = 1e-12);
        }
    }

    #[test]
    fn frequency_like_weights() {
        // weights [1, 2, 1] put the mean at 2
        let stats = WeightedStats::new(&[1., 2., 3.], &[1., 2., 1.]);
        assert_relative_eq!(stats.mean, 2., max_relative = 1e-12);
        // Σw(x-m)² = 2, W - Σw²/W = 4 - 6/4 = 2.5
        assert_relative_eq!(stats.var, 0.8, max_relative = 1e-12);
    }

    #[test]
    fn zero_weights_are_ignored_for_moments() {
        let stats = WeightedStats::new(&[1., 2., 100.], &[1., 1., 0.]);
        assert_eq!(stats.count, 3);
        assert_relative_eq!(stats.mean, 1.5, max_relative = 1e-12);
        assert_relative_eq!(stats.var, 0.5, max_relative = 1e-12);
    }
}
