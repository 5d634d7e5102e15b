//! Top-level domain entity shared between countries.

use std::fmt;
use validator::Validate;

/// A domain suffix such as `.uk`.
///
/// Linked many-to-many with countries; several countries may share one
/// suffix (`.fr` is used by France and Saint Martin).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopLevelDomain {
    pub id: i64,
    pub name: String,
}

impl TopLevelDomain {
    /// Creates a new TopLevelDomain instance.
    pub fn new(id: i64, name: String) -> Self {
        Self { id, name }
    }
}

/// Input data for inserting a top-level domain.
///
/// The length limit matches `top_level_domains.name VARCHAR(63)`, counted
/// in characters.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewTopLevelDomain {
    #[validate(length(min = 1, max = 63))]
    pub name: String,
}

impl fmt::Display for TopLevelDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
