use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lowest rating a guest can give.
pub const MIN_RATING: i64 = 1;
/// Highest rating a guest can give.
pub const MAX_RATING: i64 = 5;

/// The action class a rating falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingOutcome {
    /// 3 or below: staff are alerted.
    Negative,
    /// 4 or above.
    Positive,
    /// Anything the thresholds do not cover (out of range or unparseable).
    Neutral,
}

impl RatingOutcome {
    /// Classifies a rating. Values outside `1..=5` are `Neutral`.
    pub fn classify(rating: i64) -> Self {
        match rating {
            MIN_RATING..=3 => Self::Negative,
            4..=MAX_RATING => Self::Positive,
            _ => Self::Neutral,
        }
    }
}

/// A guest rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    value: i64,
}

impl Rating {
    /// Takes a rating exactly as received.
    pub fn unclamped(value: i64) -> Self {
        Self { value }
    }

    /// Forces a rating into `1..=5`.
    pub fn clamped(value: i64) -> Self {
        Self {
            value: value.clamp(MIN_RATING, MAX_RATING),
        }
    }

    pub fn value(self) -> i64 {
        self.value
    }

    pub fn outcome(self) -> RatingOutcome {
        RatingOutcome::classify(self.value)
    }

    /// Parses the leading integer of a rating string:
    /// `"4"`, `" 4 stars"` and `"4.5"` all give 4.
    pub fn parse_leading(text: &str) -> Option<i64> {
        let trimmed = text.trim_start();
        let (sign, digits) = match trimmed.as_bytes().first() {
            Some(b'-') => (-1, &trimmed[1..]),
            Some(b'+') => (1, &trimmed[1..]),
            _ => (1, trimmed),
        };
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        if end == 0 {
            return None;
        }
        digits[..end].parse::<i64>().ok().map(|n| n * sign)
    }

    /// Reads a rating out of a JSON value (number or numeric string).
    pub fn parse_value(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
            Value::String(s) => Self::parse_leading(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
