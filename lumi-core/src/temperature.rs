//! Mapping from a filter position to a gamma triple.

use crate::gamma::GammaTriple;
use crate::state::{FilterMode, FilterState};

/// Floor for the mid (green) channel.
const MID_FLOOR: f64 = 0.5;
/// Floor for the opposing channel (blue when warm, red when cool).
const OPPOSING_FLOOR: f64 = 0.3;

/// Compute the gamma triple for `mode` at `intensity`.
///
/// The dominant channel stays at `1.0`. The mid channel drops by
/// `intensity / 200` down to `0.5`, the opposing one by `intensity / 100`
/// down to `0.3`. Neutral is always the identity.
pub fn compute(mode: FilterMode, intensity: u8) -> GammaTriple {
    let intensity = f64::from(intensity);
    let mid = (1.0 - intensity / 200.0).max(MID_FLOOR);
    let opposing = (1.0 - intensity / 100.0).max(OPPOSING_FLOOR);

    match mode {
        FilterMode::Neutral => GammaTriple::IDENTITY,
        FilterMode::Warm => GammaTriple::new(1.0, mid, opposing),
        FilterMode::Cool => GammaTriple::new(opposing, mid, 1.0),
    }
}

impl FilterState {
    /// The gamma triple this state maps to.
    pub fn gamma(&self) -> GammaTriple {
        compute(self.mode, self.intensity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warm_matches_formula() {
        for i in 0..=100u8 {
            let g = compute(FilterMode::Warm, i);
            let x = f64::from(i);
            assert_eq!(g.red, 1.0);
            assert_eq!(g.green, f64::max(0.5, 1.0 - x / 200.0));
            assert_eq!(g.blue, f64::max(0.3, 1.0 - x / 100.0));
        }
    }

    #[test]
    fn test_cool_mirrors_warm() {
        for i in 0..=100u8 {
            let warm = compute(FilterMode::Warm, i);
            let cool = compute(FilterMode::Cool, i);
            assert_eq!(cool.blue, 1.0);
            assert_eq!(cool.green, warm.green);
            assert_eq!(cool.red, warm.blue);
        }
    }

    #[test]
    fn test_neutral_ignores_intensity() {
        for i in 0..=100u8 {
            assert_eq!(compute(FilterMode::Neutral, i), GammaTriple::IDENTITY);
        }
    }

    #[test]
    fn test_attenuation_is_monotonic() {
        for mode in [FilterMode::Warm, FilterMode::Cool] {
            for i in 1..=100u8 {
                let prev = compute(mode, i - 1);
                let next = compute(mode, i);
                assert!(next.red <= prev.red);
                assert!(next.green <= prev.green);
                assert!(next.blue <= prev.blue);
            }
        }
    }

    #[test]
    fn test_breakpoints() {
        assert_eq!(compute(FilterMode::Warm, 50), GammaTriple::new(1.0, 0.75, 0.5));
        assert_eq!(compute(FilterMode::Cool, 100), GammaTriple::new(0.3, 0.5, 1.0));
        assert_eq!(compute(FilterMode::Warm, 0), GammaTriple::IDENTITY);
        // opposing channel floors out before the mid channel does
        let g = compute(FilterMode::Warm, 80);
        assert_eq!(g.blue, 0.3);
        assert!((g.green - 0.6).abs() < 1e-12);
    }
}
