use crate::internal::common::resources::ResourceParseError;
use derive_more::{Add, AddAssign, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub type ResourceUnits = u32;
pub type ResourceFractions = u32;

pub const FRACTIONS_PER_UNIT: ResourceFractions = 10_000;
pub const FRACTIONS_MAX_DIGITS: usize = 4; // = log10(FRACTIONS_PER_UNIT)

/// Fixed-point scalar value of a resource (e.g. `disk:10.5` megabytes).
#[derive(
    Debug,
    Default,
    Serialize,
    Clone,
    Copy,
    Hash,
    Eq,
    Deserialize,
    PartialEq,
    Ord,
    PartialOrd,
    AddAssign,
    SubAssign,
    Sub,
    Add,
    Sum,
)]
pub struct ResourceAmount(u64);

impl ResourceAmount {
    pub const ZERO: ResourceAmount = ResourceAmount(0);

    pub fn new(units: ResourceUnits, fractions: ResourceFractions) -> Self {
        assert!(fractions < FRACTIONS_PER_UNIT);
        ResourceAmount(units as u64 * FRACTIONS_PER_UNIT as u64 + fractions as u64)
    }

    pub fn new_units(units: ResourceUnits) -> Self {
        ResourceAmount(units as u64 * FRACTIONS_PER_UNIT as u64)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn units(&self) -> ResourceUnits {
        (self.0 / (FRACTIONS_PER_UNIT as u64)) as ResourceUnits
    }

    pub fn fractions(&self) -> ResourceFractions {
        (self.0 % (FRACTIONS_PER_UNIT as u64)) as ResourceFractions
    }

    pub fn checked_sub(&self, other: ResourceAmount) -> Option<ResourceAmount> {
        self.0.checked_sub(other.0).map(ResourceAmount)
    }
}

impl From<ResourceUnits> for ResourceAmount {
    fn from(units: ResourceUnits) -> Self {
        Self::new_units(units)
    }
}

impl FromStr for ResourceAmount {
    type Err = ResourceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ResourceParseError::InvalidAmount(s.to_string());
        let s = s.trim();
        let (units, fractions) = match s.split_once('.') {
            Some((units, fractions)) => (units, fractions),
            None => (s, ""),
        };
        if units.is_empty()
            || fractions.len() > FRACTIONS_MAX_DIGITS
            || !units.bytes().all(|b| b.is_ascii_digit())
            || !fractions.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let units: ResourceUnits = units.parse().map_err(|_| invalid())?;
        let fractions: ResourceFractions = if fractions.is_empty() {
            0
        } else {
            let padded = format!("{fractions:0<FRACTIONS_MAX_DIGITS$}");
            padded.parse().map_err(|_| invalid())?
        };
        Ok(ResourceAmount::new(units, fractions))
    }
}

impl std::fmt::Display for ResourceAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let fractions = self.fractions();
        write!(f, "{}", self.units())?;
        if fractions != 0 {
            let num = format!("{:01$}", fractions, FRACTIONS_MAX_DIGITS);
            write!(f, ".{}", num.trim_end_matches('0'))?;
        }
        Ok(())
    }
}
