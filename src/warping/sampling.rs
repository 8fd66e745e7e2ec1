use ndarray::{ArrayD, IxDyn, arr0};
use rand::SeedableRng;
use rand::distributions::{Distribution, Uniform as UniformDist};
use rand::rngs::StdRng;
use std::sync::Mutex;

/// Source of random warping parameters.
///
/// `sample(size)` returns an array of shape `size` (or any shape that
/// broadcasts against it, e.g. a 0-d array for a shared value). Closures
/// `Fn(&[usize]) -> ArrayD<f64>` are samplers too.
pub trait Sampler: Send + Sync {
    fn sample(&self, size: &[usize]) -> ArrayD<f64>;
}

impl<F> Sampler for F
where
    F: Fn(&[usize]) -> ArrayD<f64> + Send + Sync,
{
    fn sample(&self, size: &[usize]) -> ArrayD<f64> {
        self(size)
    }
}

/// Always returns the same value as a 0-d array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub f64);

impl Sampler for Constant {
    fn sample(&self, _size: &[usize]) -> ArrayD<f64> {
        arr0(self.0).into_dyn()
    }
}

/// I.i.d. samples from the closed interval `[low, high]`.
///
/// Without a seed the thread-local rng is used; a seeded sampler owns a
/// [`StdRng`] and produces the same sequence on every run.
#[derive(Debug)]
pub struct Uniform {
    dist: UniformDist<f64>,
    rng: Option<Mutex<StdRng>>,
}

impl Uniform {
    /// Uniform sampler backed by the thread-local rng.
    ///
    /// # Errors
    /// Returns an error if the bounds are not finite or `low > high`.
    pub fn new(low: f64, high: f64) -> crate::Result<Self> {
        Ok(Self {
            dist: Self::dist(low, high)?,
            rng: None,
        })
    }

    /// Uniform sampler with a reproducible, seeded rng.
    pub fn seeded(low: f64, high: f64, seed: u64) -> crate::Result<Self> {
        Ok(Self {
            dist: Self::dist(low, high)?,
            rng: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        })
    }

    fn dist(low: f64, high: f64) -> crate::Result<UniformDist<f64>> {
        if !low.is_finite() || !high.is_finite() || low > high {
            return Err(crate::Error::InvalidParameter {
                name: "low..high",
                value: format!("{low}..{high}"),
                reason: "bounds must be finite with low <= high".to_string(),
            });
        }
        Ok(UniformDist::new_inclusive(low, high))
    }
}

impl Sampler for Uniform {
    fn sample(&self, size: &[usize]) -> ArrayD<f64> {
        match &self.rng {
            Some(rng) => {
                // a poisoned lock still holds a usable rng
                let mut rng = rng.lock().unwrap_or_else(|e| e.into_inner());
                ArrayD::from_shape_fn(IxDyn(size), |_| self.dist.sample(&mut *rng))
            }
            None => {
                let mut rng = rand::thread_rng();
                ArrayD::from_shape_fn(IxDyn(size), |_| self.dist.sample(&mut rng))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_is_scalar() {
        let s = Constant(0.7).sample(&[2, 3]);
        assert_eq!(s.ndim(), 0);
        assert_eq!(s.iter().next(), Some(&0.7));
    }

    #[test]
    fn test_uniform_shape_and_bounds() {
        let u = Uniform::new(0.9, 1.1).unwrap();
        let s = u.sample(&[4, 5]);
        assert_eq!(s.shape(), &[4, 5]);
        assert!(s.iter().all(|&v| (0.9..=1.1).contains(&v)));

        let scalar = u.sample(&[]);
        assert_eq!(scalar.ndim(), 0);
    }

    #[test]
    fn test_uniform_seeded_is_reproducible() {
        let a = Uniform::seeded(0.6, 0.7, 42).unwrap();
        let b = Uniform::seeded(0.6, 0.7, 42).unwrap();
        assert_eq!(a.sample(&[8]), b.sample(&[8]));
        // successive draws advance the rng
        assert_ne!(a.sample(&[8]), a.sample(&[8]));
    }

    #[test]
    fn test_uniform_degenerate_interval() {
        let u = Uniform::new(1.0, 1.0).unwrap();
        assert!(u.sample(&[3]).iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_uniform_invalid_bounds() {
        assert!(Uniform::new(1.1, 0.9).is_err());
        assert!(Uniform::seeded(f64::NAN, 1.0, 0).is_err());
    }

    #[test]
    fn test_closure_sampler() {
        let sampler = |size: &[usize]| ArrayD::from_elem(IxDyn(size), 1.05);
        let s = sampler.sample(&[2]);
        assert_eq!(s.shape(), &[2]);
        assert!(s.iter().all(|&v| v == 1.05));
    }
}
