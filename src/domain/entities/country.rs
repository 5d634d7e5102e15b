//! Country entity and its write models.

use std::fmt;
use validator::Validate;

/// A persisted country.
///
/// Every country belongs to exactly one [`super::Region`]; its top-level
/// domain links are stored separately and replaced wholesale on each run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub alpha2_code: String,
    pub alpha3_code: String,
    pub population: i64,
    pub capital: Option<String>,
    pub region_id: i64,
}

impl Country {
    /// Builds a country from its identifier, name and mutable attributes.
    pub fn from_fields(id: i64, name: String, fields: CountryFields) -> Self {
        Self {
            id,
            name,
            alpha2_code: fields.alpha2_code,
            alpha3_code: fields.alpha3_code,
            population: fields.population,
            capital: fields.capital,
            region_id: fields.region_id,
        }
    }

    /// Overwrites every mutable attribute with `fields`.
    pub fn apply(&mut self, fields: CountryFields) {
        self.alpha2_code = fields.alpha2_code;
        self.alpha3_code = fields.alpha3_code;
        self.population = fields.population;
        self.capital = fields.capital;
        self.region_id = fields.region_id;
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Mutable attributes of a country, written on both insert and update.
///
/// Length limits match the column widths of the `countries` table.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct CountryFields {
    #[validate(length(max = 2))]
    pub alpha2_code: String,
    #[validate(length(max = 3))]
    pub alpha3_code: String,
    pub population: i64,
    #[validate(length(min = 1, max = 50))]
    pub capital: Option<String>,
    pub region_id: i64,
}

/// Input data for inserting a new country.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewCountry {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(nested)]
    pub fields: CountryFields,
}
