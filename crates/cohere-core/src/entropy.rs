use rand::Rng;

/// Randomness consumed by the environment clock.
///
/// Every `rand::Rng` is an entropy source, so a `SmallRng` seeded with
/// `seed_from_u64` gives reproducible sessions. Tests can supply a scripted
/// source to pin exact interrupt sequences.
pub trait EntropySource {
    /// Uniform draw from `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// Bernoulli trial that succeeds with `probability`.
    fn chance(&mut self, probability: f64) -> bool;
}

impl<R: Rng + ?Sized> EntropySource for R {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.random_range(low..high)
    }

    fn chance(&mut self, probability: f64) -> bool {
        self.random_bool(probability.clamp(0.0, 1.0))
    }
}
