use serde::{Deserialize, Serialize};

/// Ordinal time coordinate. The original payloads carry integer years.
pub type Year = i32;

/// Inclusive bounds over the ordinal time axis.
///
/// Either endpoint may be unset (open-ended). Once both are set the invariant
/// `min <= max` holds; mutation paths reject updates that would break it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeDomain {
    pub min: Option<Year>,
    pub max: Option<Year>,
}

impl TimeDomain {
    #[must_use]
    pub fn new(min: Year, max: Year) -> Option<Self> {
        if min <= max {
            Some(Self {
                min: Some(min),
                max: Some(max),
            })
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_set(self) -> bool {
        self.min.is_some() && self.max.is_some()
    }

    /// Whether `year` falls inside the domain, treating unset endpoints as
    /// unbounded.
    #[must_use]
    pub fn contains(self, year: Year) -> bool {
        self.min.map_or(true, |min| year >= min) && self.max.map_or(true, |max| year <= max)
    }
}
