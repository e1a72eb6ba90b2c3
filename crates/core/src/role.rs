// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Authority levels and the role gate predicate
//!
//! Roles form a total order: `unit_member < unit_admin < central_admin`.
//! Requirements are either hierarchical ("at least this role") or an exact
//! allow-set that ignores rank.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// An authority level, ordered by rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    UnitMember,
    UnitAdmin,
    CentralAdmin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::UnitMember, Role::UnitAdmin, Role::CentralAdmin];

    pub fn rank(self) -> u8 {
        match self {
            Role::UnitMember => 0,
            Role::UnitAdmin => 1,
            Role::CentralAdmin => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::UnitMember => "unit_member",
            Role::UnitAdmin => "unit_admin",
            Role::CentralAdmin => "central_admin",
        }
    }

    /// Whether this role is at least as authoritative as `other`
    pub fn at_least(self, other: Role) -> bool {
        self.rank() >= other.rank()
    }
}

impl PartialOrd for Role {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Role {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRoleName(pub String);

impl FromStr for Role {
    type Err = UnknownRoleName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "unit_member" => Ok(Role::UnitMember),
            "unit_admin" => Ok(Role::UnitAdmin),
            "central_admin" => Ok(Role::CentralAdmin),
            other => Err(UnknownRoleName(other.to_string())),
        }
    }
}

/// The role a session asserts, which may not be one we recognize
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoleClaim {
    Known(Role),
    Unknown(String),
}

impl RoleClaim {
    /// Parse a role name; unrecognized names are kept as `Unknown`
    pub fn parse(s: &str) -> Self {
        match s.parse::<Role>() {
            Ok(role) => RoleClaim::Known(role),
            Err(UnknownRoleName(name)) => RoleClaim::Unknown(name),
        }
    }

    pub fn known(&self) -> Option<Role> {
        match self {
            RoleClaim::Known(role) => Some(*role),
            RoleClaim::Unknown(_) => None,
        }
    }

    pub fn is(&self, role: Role) -> bool {
        self.known() == Some(role)
    }
}

impl From<Role> for RoleClaim {
    fn from(role: Role) -> Self {
        RoleClaim::Known(role)
    }
}

impl From<String> for RoleClaim {
    fn from(s: String) -> Self {
        RoleClaim::parse(&s)
    }
}

impl From<RoleClaim> for String {
    fn from(claim: RoleClaim) -> Self {
        claim.to_string()
    }
}

impl fmt::Display for RoleClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleClaim::Known(role) => write!(f, "{}", role),
            RoleClaim::Unknown(name) => f.write_str(name),
        }
    }
}

/// What a guarded action or view demands of the caller's role
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleRequirement {
    /// Hierarchical: any role with rank >= the given role
    AtLeast(Role),
    /// Exact membership; rank is ignored
    AnyOf(BTreeSet<Role>),
}

impl RoleRequirement {
    pub fn any_of(roles: impl IntoIterator<Item = Role>) -> Self {
        RoleRequirement::AnyOf(roles.into_iter().collect())
    }
}

impl From<Role> for RoleRequirement {
    fn from(role: Role) -> Self {
        RoleRequirement::AtLeast(role)
    }
}

impl fmt::Display for RoleRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleRequirement::AtLeast(role) => write!(f, "at least {role}"),
            RoleRequirement::AnyOf(roles) => {
                let names: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();
                write!(f, "any of [{}]", names.join(", "))
            }
        }
    }
}

/// The role gate. An absent or unrecognized role never qualifies.
pub fn has_required_role(user: Option<&RoleClaim>, required: &RoleRequirement) -> bool {
    let Some(role) = user.and_then(RoleClaim::known) else {
        return false;
    };
    match required {
        RoleRequirement::AnyOf(allowed) => allowed.contains(&role),
        RoleRequirement::AtLeast(minimum) => role.at_least(*minimum),
    }
}

#[cfg(test)]
#[path = "role_tests.rs"]
mod tests;
