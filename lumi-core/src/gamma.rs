//! Gamma triple type and its text forms.

use std::fmt;
use std::str::FromStr;

use crate::error::FilterError;

/// Per-channel multiplicative gamma adjustment, relative to the display's
/// native calibration.
///
/// Channels are conventionally in `(0.0, 1.0]`, although a captured original
/// may report values above `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaTriple {
    /// Red channel multiplier.
    pub red: f64,
    /// Green channel multiplier.
    pub green: f64,
    /// Blue channel multiplier.
    pub blue: f64,
}

impl GammaTriple {
    /// The identity adjustment `(1.0, 1.0, 1.0)`.
    pub const IDENTITY: Self = Self::new(1.0, 1.0, 1.0);

    /// Create a triple from its three channels.
    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }

    /// Format the triple the way `xrandr --gamma` expects it (`r:g:b`).
    pub fn to_xrandr_arg(&self) -> String {
        format!("{}:{}:{}", self.red, self.green, self.blue)
    }

    /// Parse a triple separated by `sep`.
    ///
    /// Exactly three finite, positive floats are accepted.
    pub fn parse_with(s: &str, sep: char) -> Result<Self, FilterError> {
        let corrupt = || FilterError::ConfigCorrupt(format!("invalid gamma triple '{s}'"));

        let channels = s
            .split(sep)
            .map(|part| part.trim().parse::<f64>().map_err(|_| corrupt()))
            .collect::<Result<Vec<_>, _>>()?;

        match channels.as_slice() {
            &[red, green, blue]
                if channels.iter().all(|c| c.is_finite() && *c > 0.0) =>
            {
                Ok(Self::new(red, green, blue))
            }
            _ => Err(corrupt()),
        }
    }
}

impl Default for GammaTriple {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Storage form: `red,green,blue`.
impl fmt::Display for GammaTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.red, self.green, self.blue)
    }
}

impl FromStr for GammaTriple {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, ',')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_storage_form() {
        let triple: GammaTriple = "1.0, 0.75,0.5".parse().unwrap();
        assert_eq!(triple, GammaTriple::new(1.0, 0.75, 0.5));
        assert_eq!(triple.to_string().parse::<GammaTriple>().unwrap(), triple);
    }

    #[test]
    fn test_parse_xrandr_form() {
        let triple = GammaTriple::parse_with("1.0:0.8:0.6", ':').unwrap();
        assert_eq!(triple, GammaTriple::new(1.0, 0.8, 0.6));
        assert_eq!(triple.to_xrandr_arg(), "1:0.8:0.6");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "1.0,1.0", "1.0,1.0,1.0,1.0", "a,b,c", "1.0,0,1.0", "1.0,-1,1.0", "NaN,1,1"] {
            assert!(
                matches!(input.parse::<GammaTriple>(), Err(FilterError::ConfigCorrupt(_))),
                "accepted {input:?}"
            );
        }
    }
}
