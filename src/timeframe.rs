use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    str::FromStr,
};

use crate::ConfigError;

/// Chart timeframe of a bar series.
///
/// Ordered by bar duration, so `Timeframe::H1 > Timeframe::M15`.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Timeframe {
    M1,
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
    W1,
    /// Nominal 30 days.
    MN1,
}

impl Timeframe {
    /// Nominal bar duration in seconds.
    #[must_use]
    pub const fn seconds(self) -> u64 {
        match self {
            Self::M1 => 60,
            Self::M5 => 5 * 60,
            Self::M15 => 15 * 60,
            Self::M30 => 30 * 60,
            Self::H1 => 3_600,
            Self::H4 => 4 * 3_600,
            Self::D1 => 86_400,
            Self::W1 => 7 * 86_400,
            Self::MN1 => 30 * 86_400,
        }
    }

    /// Short name, as shown in alert messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::M1 => "M1",
            Self::M5 => "M5",
            Self::M15 => "M15",
            Self::M30 => "M30",
            Self::H1 => "H1",
            Self::H4 => "H4",
            Self::D1 => "D1",
            Self::W1 => "W1",
            Self::MN1 => "MN1",
        }
    }
}

impl Ord for Timeframe {
    fn cmp(&self, other: &Self) -> Ordering {
        self.seconds().cmp(&other.seconds())
    }
}

impl PartialOrd for Timeframe {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Timeframe {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "M1" => Ok(Self::M1),
            "M5" => Ok(Self::M5),
            "M15" => Ok(Self::M15),
            "M30" => Ok(Self::M30),
            "H1" => Ok(Self::H1),
            "H4" => Ok(Self::H4),
            "D1" => Ok(Self::D1),
            "W1" => Ok(Self::W1),
            "MN1" => Ok(Self::MN1),
            _ => Err(ConfigError::UnknownTimeframe(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_by_duration() {
        assert!(Timeframe::M1 < Timeframe::M5);
        assert!(Timeframe::H4 > Timeframe::H1);
        assert!(Timeframe::MN1 > Timeframe::W1);
        assert_eq!(Timeframe::H1.cmp(&Timeframe::H1), Ordering::Equal);
    }

    #[test]
    fn h1_is_four_m15() {
        assert_eq!(Timeframe::H1.seconds(), 4 * Timeframe::M15.seconds());
    }

    #[test]
    fn display_uses_short_name() {
        assert_eq!(Timeframe::M15.to_string(), "M15");
        assert_eq!(Timeframe::MN1.to_string(), "MN1");
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("h4".parse::<Timeframe>(), Ok(Timeframe::H4));
        assert_eq!("MN1".parse::<Timeframe>(), Ok(Timeframe::MN1));
    }

    #[test]
    fn rejects_unknown_name() {
        assert_eq!(
            "H2".parse::<Timeframe>(),
            Err(ConfigError::UnknownTimeframe("H2".to_owned()))
        );
    }
}
