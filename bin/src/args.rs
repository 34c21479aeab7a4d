//! Argument types for the exceed CLI.

use clap::ValueEnum;
use std::{fmt, str::FromStr};

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable tables
    Text,
    /// Pretty-printed JSON
    Json,
}

/// An inclusive `min-max` range given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Range<T> {
    pub(crate) min: T,
    pub(crate) max: T,
}

impl<T> FromStr for Range<T>
where
    T: FromStr + PartialOrd,
    T::Err: fmt::Display,
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (min, max) = s
            .split_once('-')
            .ok_or_else(|| format!("Invalid range '{s}': expected MIN-MAX"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<T>()
                .map_err(|e| format!("Invalid range bound '{v}': {e}"))
        };
        let (min, max) = (parse(min)?, parse(max)?);
        if min > max {
            return Err(format!("Invalid range '{s}': MIN exceeds MAX"));
        }
        Ok(Self { min, max })
    }
}

impl<T: fmt::Display> fmt::Display for Range<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_range() {
        let years: Range<i32> = "1984-1996".parse().unwrap();
        assert_eq!(years, Range { min: 1984, max: 1996 });
        assert_eq!(years.to_string(), "1984-1996");
    }

    #[rstest]
    #[case("1996")]
    #[case("1996-1984")]
    #[case("a-b")]
    #[case("10-")]
    fn test_parse_range_invalid(#[case] input: &str) {
        assert!(input.parse::<Range<i32>>().is_err());
    }

    #[test]
    fn test_cutoff_bounds_fit_u8() {
        assert!("10-300".parse::<Range<u8>>().is_err());
        let cutoff: Range<u8> = " 0 - 100 ".parse().unwrap();
        assert_eq!((cutoff.min, cutoff.max), (0, 100));
    }
}
