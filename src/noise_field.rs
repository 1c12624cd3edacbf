//! 1‑D coherent noise used for the terrain height profile
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// 2‑D Perlin is sampled along this row; off the integer lattice so
/// whole‑number x doesn't pin the first octave to zero
const NOISE_ROW: f64 = 0.5;
const MAX_OCTAVES: usize = 16;
/// each octave doubles the frequency and halves the amplitude
const LACUNARITY: f64 = 2.0;
const PERSISTENCE: f64 = 0.5;

/// Fold any 64‑bit seed into the `u32` range the noise crate accepts.
///
/// Seeds are wrapped rather than rejected: generation never fails mid‑game.
#[inline]
pub fn wrap_seed(seed: u64) -> u32 {
    (seed & u64::from(u32::MAX)) as u32
}

/// Deterministic octave noise for a single seed.
///
/// Building the octave stack costs a permutation table per octave, so the
/// generator keeps one `NoiseField` per layer instead of calling [`sample`].
#[derive(Clone)]
pub struct NoiseField {
    fbm: Fbm<Perlin>,
    seed: u32,
    octaves: usize,
}

impl NoiseField {
    pub fn new(seed: u32, octaves: usize) -> Self {
        let octaves = octaves.clamp(1, MAX_OCTAVES);
        // one Perlin per octave, seeds counted up with wrap‑around so the
        // top of the u32 range is as usable as the bottom
        let sources = (0..octaves as u32)
            .map(|i| Perlin::new(seed.wrapping_add(i)))
            .collect();
        let fbm = Fbm::<Perlin>::new(0)
            .set_octaves(octaves)
            .set_lacunarity(LACUNARITY)
            .set_persistence(PERSISTENCE)
            .set_sources(sources);
        Self { fbm, seed, octaves }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn octaves(&self) -> usize {
        self.octaves
    }

    /// value in `[-1, 1]`, continuous in `x`
    #[inline]
    pub fn sample(&self, x: f64) -> f64 {
        if !x.is_finite() {
            return 0.0;
        }
        // Fbm divides by `1 - p^n`; the octave amplitudes sum to
        // `(1 - p^n) / (1 - p)`, so one more factor brings it back to unit range
        (self.fbm.get([x, NOISE_ROW]) * (1.0 - PERSISTENCE)).clamp(-1.0, 1.0)
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("seed", &self.seed)
            .field("octaves", &self.octaves)
            .finish()
    }
}

/// One‑shot sample; same inputs always give the same output.
pub fn sample(x: f64, seed: u32, octaves: usize) -> f64 {
    NoiseField::new(seed, octaves).sample(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_deterministic() {
        for i in 0..64 {
            let x = i as f64 * 0.37;
            assert_eq!(sample(x, 42, 4), sample(x, 42, 4));
        }
    }

    #[test]
    fn cached_field_matches_one_shot_sample() {
        let field = NoiseField::new(7, 6);
        for i in -20..20 {
            let x = i as f64 * 0.13;
            assert_eq!(field.sample(x), sample(x, 7, 6));
        }
    }

    #[test]
    fn output_stays_in_unit_range() {
        let field = NoiseField::new(123, 6);
        for i in -500..500 {
            let v = field.sample(i as f64 * 0.071);
            assert!((-1.0..=1.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn output_is_continuous() {
        let field = NoiseField::new(42, 4);
        for i in -200..200 {
            let x = i as f64 * 0.05;
            let a = field.sample(x);
            let b = field.sample(x + 1e-6);
            assert!((a - b).abs() < 1e-3, "jump at {x}: {a} vs {b}");
        }
    }

    #[test]
    fn seeds_decorrelate_layers() {
        let a = NoiseField::new(42, 4);
        let b = NoiseField::new(43, 4);
        let differs = (0..50).any(|i| {
            let x = i as f64 * 0.21;
            a.sample(x) != b.sample(x)
        });
        assert!(differs);
    }

    #[test]
    fn out_of_range_inputs_degrade_quietly() {
        assert_eq!(wrap_seed(u64::MAX), u32::MAX);
        assert_eq!(wrap_seed(u64::from(u32::MAX) + 5), 4);
        assert_eq!(sample(f64::NAN, 1, 4), 0.0);
        assert_eq!(NoiseField::new(1, 0).octaves(), 1);
        assert_eq!(NoiseField::new(1, 1_000).octaves(), MAX_OCTAVES);
    }

    #[test]
    fn seeds_at_the_top_of_the_range_sample() {
        for seed in u32::MAX - 10..=u32::MAX {
            let field = NoiseField::new(seed, MAX_OCTAVES);
            assert_eq!(field.seed(), seed);
            assert!((-1.0..=1.0).contains(&field.sample(3.7)));
        }
    }
}
