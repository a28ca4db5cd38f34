//! A single bounded, quantized trait value.

use rand::Rng;

/// One heritable trait.
///
/// The value always lies in `[min, max]` and moves in increments of `step`
/// when mutated. An initial value outside the range is clamped, not rounded
/// onto the step lattice.
#[derive(Clone, Debug)]
pub struct Gene {
    min: f32,
    max: f32,
    step: f32,
    value: f32,
}

impl Gene {
    /// Create a gene, clamping `initial` into `[min, max]`
    pub fn new(min: f32, max: f32, step: f32, initial: f32) -> Self {
        Self {
            min,
            max,
            step,
            value: initial.clamp(min, max),
        }
    }

    /// Shift the value by one step up, one step down, or not at all
    /// (each with probability 1/3), then clamp back into range.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let direction = rng.gen_range(-1i32..=1) as f32;
        self.value = (self.value + direction * self.step).clamp(self.min, self.max);
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    pub fn min(&self) -> f32 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Value normalised so that `min` maps to 0 and `max` maps to 1.
    /// A degenerate range (`min == max`) reports 0.
    pub fn magnitude(&self) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((self.value - self.min) / span).clamp(0.0, 1.0)
    }
}

impl std::fmt::Display for Gene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}+-{}", self.value, self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_initial_value_is_clamped() {
        assert_eq!(Gene::new(1.0, 10.0, 1.0, 42.0).value(), 10.0);
        assert_eq!(Gene::new(1.0, 10.0, 1.0, -3.0).value(), 1.0);
        // Off-lattice values are kept as they are
        assert_eq!(Gene::new(0.0, 1.0, 0.1, 0.55).value(), 0.55);
    }

    #[test]
    fn test_magnitude() {
        let gene = Gene::new(100.0, 1000.0, 100.0, 550.0);
        assert!((gene.magnitude() - 0.5).abs() < 1e-6);
        assert_eq!(Gene::new(1.0, 1.0, 1.0, 1.0).magnitude(), 0.0);
    }

    #[test]
    fn test_mutation_moves_at_most_one_step() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut gene = Gene::new(0.0, 100.0, 5.0, 50.0);
        for _ in 0..200 {
            let before = gene.value();
            gene.mutate(&mut rng);
            let delta = (gene.value() - before).abs();
            assert!(delta == 0.0 || (delta - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_mutation_hits_all_three_outcomes() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (mut up, mut down, mut same) = (0, 0, 0);
        for _ in 0..3000 {
            let mut gene = Gene::new(0.0, 10.0, 1.0, 5.0);
            gene.mutate(&mut rng);
            match gene.value() as i32 {
                6 => up += 1,
                4 => down += 1,
                _ => same += 1,
            }
        }
        // Each outcome is roughly a third
        for count in [up, down, same] {
            assert!(count > 850 && count < 1150, "skewed mutation: {up}/{down}/{same}");
        }
    }

    proptest! {
        #[test]
        fn proptest_value_stays_in_range(
            min in -50.0f32..50.0,
            span in 0.0f32..100.0,
            step in 0.01f32..30.0,
            initial in -200.0f32..200.0,
            seed in any::<u64>(),
            rounds in 0usize..64,
        ) {
            let max = min + span;
            let mut gene = Gene::new(min, max, step, initial);
            prop_assert!(gene.value() >= min && gene.value() <= max);

            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for _ in 0..rounds {
                gene.mutate(&mut rng);
                prop_assert!(gene.value() >= min && gene.value() <= max);
            }
            prop_assert!((0.0..=1.0).contains(&gene.magnitude()));
        }
    }
}
