use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A permission held by a user, scoped to a competition where relevant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Admin(i32),
    Referee(i32),
    CompetitionCreator,
    /// Roles this service does not interpret but must not drop.
    Other(String),
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin(id) => write!(f, "admin:{id}"),
            Self::Referee(id) => write!(f, "referee:{id}"),
            Self::CompetitionCreator => f.write_str("create:competition"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

impl FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let scoped = |prefix: &str| {
            s.strip_prefix(prefix)
                .and_then(|id| id.parse::<i32>().ok())
        };

        Ok(if let Some(id) = scoped("admin:") {
            Self::Admin(id)
        } else if let Some(id) = scoped("referee:") {
            Self::Referee(id)
        } else if s == "create:competition" {
            Self::CompetitionCreator
        } else {
            Self::Other(s.to_string())
        })
    }
}

/// Set of roles with exact membership tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RoleSet {
    roles: BTreeSet<Role>,
}

impl RoleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    /// Returns false when the role was already present.
    pub fn insert(&mut self, role: Role) -> bool {
        self.roles.insert(role)
    }

    pub fn is_admin_of(&self, competition_id: i32) -> bool {
        self.contains(&Role::Admin(competition_id))
    }

    pub fn is_referee_of(&self, competition_id: i32) -> bool {
        self.contains(&Role::Referee(competition_id))
    }

    /// Admins and referees both have access to a competition's data.
    pub fn has_access_to(&self, competition_id: i32) -> bool {
        self.is_admin_of(competition_id) || self.is_referee_of(competition_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.roles.iter().map(Role::to_string).collect()
    }
}

impl From<Vec<String>> for RoleSet {
    fn from(raw: Vec<String>) -> Self {
        raw.iter()
            .filter(|r| !r.trim().is_empty())
            .filter_map(|r| r.parse().ok())
            .collect()
    }
}

impl From<RoleSet> for Vec<String> {
    fn from(set: RoleSet) -> Self {
        set.to_strings()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self {
            roles: iter.into_iter().collect(),
        }
    }
}
