use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Number of recommendations to request, always within `[TopK::MIN, TopK::MAX]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TopK(u8);

impl<'de> Deserialize<'de> for TopK {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(Self::clamped(i64::deserialize(deserializer)?))
    }
}

impl TopK {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 20;
    pub const DEFAULT: u8 = 5;

    /// Clamps any integer into the allowed range
    pub fn clamped(n: i64) -> Self {
        Self(n.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    /// Reads the raw text of a number input.
    ///
    /// Anything that is not a number lands on `MIN`.
    pub fn from_input(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(value) => Self::from_number(value),
            Err(_) => Self(Self::MIN),
        }
    }

    /// Clamps any number: fractions are truncated toward the lower bound, NaN lands on `MIN`
    pub fn from_number(value: f64) -> Self {
        if value.is_nan() {
            return Self(Self::MIN);
        }
        Self(value.floor().clamp(Self::MIN as f64, Self::MAX as f64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for TopK {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl Display for TopK {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_in_range() {
        for n in 1..=20 {
            assert_eq!(TopK::clamped(n).get() as i64, n);
        }
    }

    #[test]
    fn test_clamped_below_range() {
        assert_eq!(TopK::clamped(-3).get(), 1);
        assert_eq!(TopK::clamped(0).get(), 1);
        assert_eq!(TopK::clamped(i64::MIN).get(), 1);
    }

    #[test]
    fn test_clamped_above_range() {
        assert_eq!(TopK::clamped(50).get(), 20);
        assert_eq!(TopK::clamped(21).get(), 20);
        assert_eq!(TopK::clamped(i64::MAX).get(), 20);
    }

    #[test]
    fn test_default_is_five() {
        assert_eq!(TopK::default().get(), 5);
    }

    #[test]
    fn test_from_input() {
        assert_eq!(TopK::from_input("7").get(), 7);
        assert_eq!(TopK::from_input(" 12 ").get(), 12);
        assert_eq!(TopK::from_input("7.9").get(), 7);
        assert_eq!(TopK::from_input("0.5").get(), 1);
        assert_eq!(TopK::from_input("-3").get(), 1);
        assert_eq!(TopK::from_input("50").get(), 20);
        assert_eq!(TopK::from_input("1e9").get(), 20);
    }

    #[test]
    fn test_from_input_not_a_number() {
        assert_eq!(TopK::from_input("").get(), 1);
        assert_eq!(TopK::from_input("abc").get(), 1);
        assert_eq!(TopK::from_input("NaN").get(), 1);
    }

    #[test]
    fn test_from_number() {
        assert_eq!(TopK::from_number(3.7).get(), 3);
        assert_eq!(TopK::from_number(-0.5).get(), 1);
        assert_eq!(TopK::from_number(1e300).get(), 20);
        assert_eq!(TopK::from_number(f64::INFINITY).get(), 20);
        assert_eq!(TopK::from_number(f64::NEG_INFINITY).get(), 1);
        assert_eq!(TopK::from_number(f64::NAN).get(), 1);
    }

    #[test]
    fn test_deserialize_clamps() {
        let top_k: TopK = serde_json::from_str("50").unwrap();
        assert_eq!(top_k.get(), 20);

        let top_k: TopK = serde_json::from_str("-3").unwrap();
        assert_eq!(top_k.get(), 1);
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&TopK::clamped(8)).unwrap(), "8");
    }
}
