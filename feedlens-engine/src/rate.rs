//! Rate expressions: `"<count>/<period>"`
//!
//! Period is one of `s`, `m`, `h`, `d`, optionally prefixed by a multiplier:
//! `"5/m"` allows 5 hits per minute, `"100/10m"` allows 100 hits per ten minutes.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Parsed rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rate {
    /// Hits allowed within one period
    pub count: u64,
    /// Period length in seconds
    pub period_secs: u64,
}

impl Rate {
    pub fn new(count: u64, period_secs: u64) -> CoreResult<Self> {
        let rate = Self { count, period_secs };
        if count == 0 {
            return Err(CoreError::InvalidRate(rate.to_string(), "count must be positive"));
        }
        if period_secs == 0 {
            return Err(CoreError::InvalidRate(rate.to_string(), "period must be positive"));
        }
        Ok(rate)
    }

    pub fn parse(expr: &str) -> CoreResult<Self> {
        let invalid = |reason| CoreError::InvalidRate(expr.to_string(), reason);

        let (count, period) = expr.split_once('/').ok_or_else(|| invalid("missing `/`"))?;
        let count: u64 = count.trim().parse().map_err(|_| invalid("count is not an integer"))?;

        let period = period.trim();
        let unit = period.chars().last().ok_or_else(|| invalid("missing period unit"))?;
        let unit_secs = match unit {
            's' => 1,
            'm' => 60,
            'h' => 60 * 60,
            'd' => 24 * 60 * 60,
            _ => return Err(invalid("period unit must be one of s, m, h, d")),
        };

        let multiplier_str = &period[..period.len() - unit.len_utf8()];
        let multiplier: u64 = if multiplier_str.is_empty() {
            1
        } else {
            multiplier_str.parse().map_err(|_| invalid("period multiplier is not an integer"))?
        };

        let period_secs = multiplier
            .checked_mul(unit_secs)
            .ok_or_else(|| invalid("period overflows"))?;

        if count == 0 {
            return Err(invalid("count must be positive"));
        }
        if period_secs == 0 {
            return Err(invalid("period must be positive"));
        }
        Ok(Self { count, period_secs })
    }

    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }

    /// Fixed window index containing `now_secs`.
    #[inline]
    pub fn window(&self, now_secs: u64) -> u64 {
        now_secs / self.period_secs
    }

    /// True when `hits` within one window goes over the allowed count.
    #[inline]
    pub fn is_exceeded_by(&self, hits: u64) -> bool {
        hits > self.count
    }
}

impl FromStr for Rate {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Rate {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Rate> for String {
    fn from(rate: Rate) -> Self {
        rate.to_string()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (mult, unit) = match self.period_secs {
            p if p != 0 && p % 86_400 == 0 => (p / 86_400, 'd'),
            p if p != 0 && p % 3_600 == 0 => (p / 3_600, 'h'),
            p if p != 0 && p % 60 == 0 => (p / 60, 'm'),
            p => (p, 's'),
        };
        if mult == 1 {
            write!(f, "{}/{}", self.count, unit)
        } else {
            write!(f, "{}/{}{}", self.count, mult, unit)
        }
    }
}
