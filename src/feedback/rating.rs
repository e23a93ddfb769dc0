use crate::error::RatingError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user score in `1..=5`. Out-of-range values cannot be constructed, so
/// the store never sees one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    pub fn value(self) -> i64 {
        i64::from(self.0)
    }

    /// Ratings at the top of the scale promote the artifact to the
    /// inspiration pool.
    pub fn is_top(self) -> bool {
        self.value() == Self::MAX
    }

    /// Parse a raw form value such as `"4"`.
    pub fn parse(raw: &str) -> Result<Self, RatingError> {
        let trimmed = raw.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| RatingError::NotANumber(trimmed.to_string()))?;
        Self::try_from(value)
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(RatingError::OutOfRange(value));
        }
        u8::try_from(value)
            .map(Self)
            .map_err(|_| RatingError::OutOfRange(value))
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_one_through_five() {
        for value in 1..=5 {
            assert_eq!(Rating::try_from(value).unwrap().value(), value);
        }
    }

    #[test]
    fn rejects_zero_and_six() {
        assert_eq!(Rating::try_from(0), Err(RatingError::OutOfRange(0)));
        assert_eq!(Rating::try_from(6), Err(RatingError::OutOfRange(6)));
        assert_eq!(Rating::try_from(-3), Err(RatingError::OutOfRange(-3)));
    }

    #[test]
    fn parses_form_values() {
        assert_eq!(Rating::parse(" 4 ").unwrap().value(), 4);
        assert!(matches!(Rating::parse("five"), Err(RatingError::NotANumber(_))));
        assert!(matches!(Rating::parse(""), Err(RatingError::NotANumber(_))));
    }

    #[test]
    fn only_five_is_top() {
        assert!(Rating::try_from(5).unwrap().is_top());
        assert!(!Rating::try_from(4).unwrap().is_top());
    }

    #[test]
    fn serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<Rating>("7").is_err());
        assert_eq!(serde_json::from_str::<Rating>("3").unwrap().value(), 3);
        assert_eq!(serde_json::to_string(&Rating::try_from(2).unwrap()).unwrap(), "2");
    }
}
