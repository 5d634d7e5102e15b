//! Incoming country record as published in the source dataset.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// One element of the published `countries.json` array.
///
/// Missing or `null` string fields deserialize to empty strings so the
/// reconciler can apply its skip/fail policy; `population` keeps its
/// nullability because a missing value aborts the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "alpha2Code", default, deserialize_with = "null_as_default")]
    pub alpha2_code: String,
    #[serde(rename = "alpha3Code", default, deserialize_with = "null_as_default")]
    pub alpha3_code: String,
    #[serde(default)]
    pub population: Option<i64>,
    #[serde(default)]
    pub capital: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(rename = "topLevelDomain", default, deserialize_with = "null_as_default")]
    pub top_level_domain: Vec<String>,
}

impl CountryRecord {
    /// Records without a name are ignored entirely.
    pub fn is_skipped(&self) -> bool {
        self.name.is_empty()
    }

    /// Capital with surrounding whitespace removed; blank or missing becomes `None`.
    pub fn normalized_capital(&self) -> Option<String> {
        self.capital
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }

    /// Distinct, non-empty top-level domains of this record.
    pub fn top_level_domains(&self) -> BTreeSet<&str> {
        self.top_level_domain
            .iter()
            .map(String::as_str)
            .filter(|tld| !tld.is_empty())
            .collect()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
