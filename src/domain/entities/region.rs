//! Region entity grouping countries geographically.

use std::fmt;
use validator::Validate;

/// A geographic region such as "Europe" or "Americas".
///
/// The name is the natural key; regions are created and deleted but never
/// updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub id: i64,
    pub name: String,
}

impl Region {
    /// Creates a new Region instance.
    pub fn new(id: i64, name: String) -> Self {
        Self { id, name }
    }
}

/// Input data for inserting a region.
///
/// The length limit matches `regions.name VARCHAR(100)`.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewRegion {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_creation() {
        let region = Region::new(1, "Europe".to_string());

        assert_eq!(region.id, 1);
        assert_eq!(region.name, "Europe");
    }

    #[test]
    fn test_new_region_name_width() {
        assert!(NewRegion { name: "R".repeat(100) }.validate().is_ok());
        assert!(NewRegion { name: "R".repeat(101) }.validate().is_err());
        assert!(NewRegion { name: String::new() }.validate().is_err());
    }

    #[test]
    fn test_region_display_is_name() {
        let region = Region::new(7, "Oceania".to_string());
        assert_eq!(region.to_string(), "Oceania");
    }
}
