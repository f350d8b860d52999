use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Uniform draw over the scheme's colors, reproducible from its seed.
#[derive(Clone, Debug)]
pub struct RandomSequenceGenerator {
    seed: u64,
    rng: SmallRng,
}

impl RandomSequenceGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl SequenceGenerator for RandomSequenceGenerator {
    fn next_color(&mut self, scheme: ColorScheme) -> ColorId {
        let palette = scheme.palette();
        let (color, _) = palette[self.rng.random_range(0..palette.len())];
        log::trace!("generated {} (seed {})", color, self.seed);
        color
    }
}
