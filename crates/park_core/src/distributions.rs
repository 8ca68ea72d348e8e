//! Probability distributions for inter-arrival and service times.
//!
//! Sampling goes through an explicitly passed RNG so simulation runs are
//! reproducible and independently seedable.

use rand::Rng;

use crate::errors::ParkError;

/// Exponential distribution with rate parameter lambda (events per time unit).
///
/// Used both for the Poisson arrival process (inter-arrival gaps) and for
/// per-station service durations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    rate: f64,
}

impl Exponential {
    /// Rejects rates that are not strictly positive finite numbers.
    pub fn new(rate: f64) -> Result<Self, ParkError> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ParkError::InvalidRate(rate));
        }
        Ok(Self { rate })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Sample a duration: -ln(U) / lambda, where U is uniform in [0, 1).
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.gen();
        let u = u.max(1e-10); // Avoid log(0)
        -u.ln() / self.rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn samples_are_strictly_positive() {
        let dist = Exponential::new(1.5).expect("valid rate");
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(dist.sample(&mut rng) > 0.0);
        }
    }

    #[test]
    fn sample_mean_tracks_inverse_rate() {
        let dist = Exponential::new(2.0).expect("valid rate");
        let mut rng = StdRng::seed_from_u64(42);
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| dist.sample(&mut rng)).sum::<f64>() / n as f64;
        assert!((mean - 0.5).abs() < 0.05, "mean {mean} far from 0.5");
    }

    #[test]
    fn rejects_non_positive_or_non_finite_rates() {
        assert!(Exponential::new(0.0).is_err());
        assert!(Exponential::new(-1.0).is_err());
        assert!(Exponential::new(f64::NAN).is_err());
        assert!(Exponential::new(f64::INFINITY).is_err());
    }
}
