// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Organizational units and the central-approval partition

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of an organizational unit (a small positive integer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct UnitId(u32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitIdError {
    #[error("unit id must be positive")]
    Zero,
    #[error("invalid unit id: {0}")]
    Invalid(String),
}

impl UnitId {
    pub fn new(id: u32) -> Result<Self, UnitIdError> {
        if id == 0 {
            return Err(UnitIdError::Zero);
        }
        Ok(UnitId(id))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for UnitId {
    type Error = UnitIdError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        UnitId::new(id)
    }
}

impl From<UnitId> for u32 {
    fn from(id: UnitId) -> Self {
        id.0
    }
}

impl FromStr for UnitId {
    type Err = UnitIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u32 = s
            .trim()
            .parse()
            .map_err(|_| UnitIdError::Invalid(s.to_string()))?;
        UnitId::new(n)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How many approval stages a unit's requests pass through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitCategory {
    /// Unit-level approval is followed by central approval
    CentralApproval,
    /// The unit admin is the terminal approver
    UnitOnly,
}

/// The fixed set of units whose requests need central approval.
///
/// Everything outside the set, including an absent unit, is unit-only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CentralApprovalUnits {
    units: BTreeSet<UnitId>,
}

impl CentralApprovalUnits {
    pub fn new(units: impl IntoIterator<Item = UnitId>) -> Self {
        Self {
            units: units.into_iter().collect(),
        }
    }

    /// Build from raw ids, rejecting zero
    pub fn from_ids(ids: impl IntoIterator<Item = u32>) -> Result<Self, UnitIdError> {
        let units = ids
            .into_iter()
            .map(UnitId::new)
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { units })
    }

    pub fn contains(&self, unit: Option<UnitId>) -> bool {
        unit.is_some_and(|u| self.units.contains(&u))
    }

    pub fn category(&self, unit: Option<UnitId>) -> UnitCategory {
        if self.contains(unit) {
            UnitCategory::CentralApproval
        } else {
            UnitCategory::UnitOnly
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
#[path = "unit_tests.rs"]
mod tests;
