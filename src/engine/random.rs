use rand::Rng;

/// Uniform float in `[min, max)`. An empty or inverted range yields `min`
/// instead of panicking, so zero-width jitter settings are allowed.
pub fn range<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Symmetric jitter around `base`: `base + [-spread, spread)`.
pub fn jitter<R: Rng>(rng: &mut R, base: f64, spread: f64) -> f64 {
    base + range(rng, -spread.abs(), spread.abs())
}

/// Uniform integer in `[min, max)`, `min` for an empty range.
pub fn range_int<R: Rng>(rng: &mut R, min: u32, max: u32) -> u32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}
