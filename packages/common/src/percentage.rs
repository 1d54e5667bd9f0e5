use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

/// A percentage held as an integer number of hundredths (`6667` is 66.67%).
///
/// Serializes as a string with exactly two decimals, e.g. `"66.67"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percentage(u32);

impl Percentage {
    pub const ZERO: Percentage = Percentage(0);

    pub fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    /// `part / whole * 100`, rounded half-up to two decimals. `None` when `whole` is zero.
    pub fn of(part: u64, whole: u64) -> Option<Self> {
        if whole == 0 {
            return None;
        }
        let part = part.min(whole);
        let hundredths = (part * 20_000 + whole) / (2 * whole);
        Some(Self(hundredths as u32))
    }

    pub fn hundredths(&self) -> u32 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Present/total day counts for one student, date, or week.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub present: u64,
    pub total: u64,
}

impl Tally {
    pub fn record(&mut self, present: bool) {
        self.total += 1;
        if present {
            self.present += 1;
        }
    }

    pub fn absent(&self) -> u64 {
        self.total - self.present
    }

    pub fn percentage(&self) -> Option<Percentage> {
        Percentage::of(self.present, self.total)
    }

    /// Exact `present / total < threshold / 100`. An empty tally is never below.
    pub fn is_below(&self, threshold: u64) -> bool {
        self.total > 0 && self.present * 100 < threshold * self.total
    }

    /// Compares the exact ratios of two tallies. Empty tallies sort lowest.
    pub fn cmp_ratio(&self, other: &Tally) -> Ordering {
        match (self.total, other.total) {
            (0, 0) => Ordering::Equal,
            (0, _) => Ordering::Less,
            (_, 0) => Ordering::Greater,
            _ => (self.present * other.total).cmp(&(other.present * self.total)),
        }
    }
}
