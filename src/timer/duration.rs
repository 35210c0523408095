use std::str::FromStr;

use thiserror::Error;

/// Longest session that can be started, four hours.
pub const MAX_SESSION_MINUTES: i64 = 4 * 60;

/// Planned length of a session in whole minutes, always within `1..=MAX_SESSION_MINUTES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SessionMinutes(u32);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("\"{0}\" is not a number")]
    NotANumber(String),
    #[error("{0} is not a whole number of minutes")]
    NotInteger(String),
    #[error("{0} is out of range, a session lasts from 1 to 240 minutes")]
    OutOfRange(i64),
}

impl SessionMinutes {
    pub fn minutes(&self) -> u32 {
        self.0
    }

    pub fn seconds(&self) -> u32 {
        self.0 * 60
    }
}

impl TryFrom<i64> for SessionMinutes {
    type Error = DurationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (1..=MAX_SESSION_MINUTES).contains(&value) {
            Ok(Self(value as u32))
        } else {
            Err(DurationError::OutOfRange(value))
        }
    }
}

impl FromStr for SessionMinutes {
    type Err = DurationError;

    /// Accepts anything that reads as a whole number, so `25` and `25.0` are both fine while
    /// `2.5` is not.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value = s
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| DurationError::NotANumber(s.to_owned()))?;
        if value.fract() != 0. {
            return Err(DurationError::NotInteger(s.to_owned()));
        }
        // Saturating cast; anything that large is out of range anyway.
        Self::try_from(value as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::{DurationError, SessionMinutes, MAX_SESSION_MINUTES};

    #[test]
    fn test_every_allowed_duration_is_valid() {
        for minutes in 1..=MAX_SESSION_MINUTES {
            let parsed = SessionMinutes::try_from(minutes).unwrap();
            assert_eq!(parsed.minutes() as i64, minutes);
            assert_eq!(parsed.seconds() as i64, minutes * 60);
        }
    }

    #[test]
    fn test_out_of_range_durations() {
        for minutes in [i64::MIN, -1, 0, MAX_SESSION_MINUTES + 1, 10_000] {
            assert_eq!(
                SessionMinutes::try_from(minutes),
                Err(DurationError::OutOfRange(minutes))
            );
        }
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!("25".parse::<SessionMinutes>().unwrap().minutes(), 25);
        assert_eq!(" 240 ".parse::<SessionMinutes>().unwrap().minutes(), 240);
        assert_eq!("25.0".parse::<SessionMinutes>().unwrap().minutes(), 25);
    }

    #[test]
    fn test_parse_rejects_invalid_input() {
        assert!(matches!(
            "2.5".parse::<SessionMinutes>(),
            Err(DurationError::NotInteger(_))
        ));
        assert!(matches!(
            "abc".parse::<SessionMinutes>(),
            Err(DurationError::NotANumber(_))
        ));
        assert!(matches!(
            "".parse::<SessionMinutes>(),
            Err(DurationError::NotANumber(_))
        ));
        assert!(matches!(
            "NaN".parse::<SessionMinutes>(),
            Err(DurationError::NotANumber(_))
        ));
        assert_eq!(
            "0".parse::<SessionMinutes>(),
            Err(DurationError::OutOfRange(0))
        );
        assert_eq!(
            "-3".parse::<SessionMinutes>(),
            Err(DurationError::OutOfRange(-3))
        );
        assert_eq!(
            "241".parse::<SessionMinutes>(),
            Err(DurationError::OutOfRange(241))
        );
    }
}
