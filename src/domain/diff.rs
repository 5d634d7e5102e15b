//! Set-difference diff engine.
//!
//! Compares the identity keys currently persisted for an entity type with
//! the keys present in an incoming dataset. Batches are sets: order inside a
//! batch carries no meaning and re-running with the same input yields the
//! same diff.

use std::collections::{BTreeSet, HashMap};

use serde_json::json;

use crate::domain::entities::CountryRecord;
use crate::error::AppError;

/// Keys to create and keys to delete for one entity type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyDiff {
    pub to_create: BTreeSet<String>,
    pub to_delete: BTreeSet<String>,
}

impl KeyDiff {
    /// Plain set algebra over the two key sets; empty keys are never created.
    pub fn between<V>(persisted: &HashMap<String, V>, incoming: &BTreeSet<String>) -> Self {
        let existing: BTreeSet<&String> = persisted.keys().collect();

        let to_create = incoming
            .iter()
            .filter(|key| !key.is_empty() && !existing.contains(key))
            .cloned()
            .collect();

        let to_delete = existing
            .into_iter()
            .filter(|key| !incoming.contains(*key))
            .cloned()
            .collect();

        Self {
            to_create,
            to_delete,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty()
    }
}

/// Country actions: every named record is upserted, absent names are deleted.
#[derive(Debug, Clone, Default)]
pub struct CountryDiff<'a> {
    pub to_upsert: Vec<&'a CountryRecord>,
    pub to_delete: BTreeSet<String>,
}

/// Distinct region names across all records, including records that are
/// otherwise skipped for lacking a country name.
pub fn incoming_region_names(records: &[CountryRecord]) -> BTreeSet<String> {
    records.iter().map(|r| r.region.clone()).collect()
}

/// Distinct non-empty top-level domains across all records.
pub fn incoming_top_level_domain_names(records: &[CountryRecord]) -> BTreeSet<String> {
    records
        .iter()
        .flat_map(|r| r.top_level_domains())
        .map(str::to_string)
        .collect()
}

/// Distinct non-empty country names.
pub fn incoming_country_names(records: &[CountryRecord]) -> BTreeSet<String> {
    records
        .iter()
        .filter(|r| !r.is_skipped())
        .map(|r| r.name.clone())
        .collect()
}

/// Diffs regions.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any record carries an empty region
/// name. Regions are mandatory, so this is an input error rather than a gap
/// to skip.
pub fn diff_regions<V>(
    persisted: &HashMap<String, V>,
    records: &[CountryRecord],
) -> Result<KeyDiff, AppError> {
    let incoming = incoming_region_names(records);

    if incoming.contains("") {
        let offenders: Vec<&str> = records
            .iter()
            .filter(|r| r.region.is_empty())
            .map(|r| r.name.as_str())
            .collect();

        return Err(AppError::bad_request(
            "Empty region name",
            json!({ "countries": offenders }),
        ));
    }

    Ok(KeyDiff::between(persisted, &incoming))
}

/// Diffs top-level domains; empty suffixes are dropped silently.
pub fn diff_top_level_domains<V>(
    persisted: &HashMap<String, V>,
    records: &[CountryRecord],
) -> KeyDiff {
    KeyDiff::between(persisted, &incoming_top_level_domain_names(records))
}

/// Diffs countries; records with an empty name are dropped silently.
pub fn diff_countries<'a, V>(
    persisted: &HashMap<String, V>,
    records: &'a [CountryRecord],
) -> CountryDiff<'a> {
    let incoming = incoming_country_names(records);
    let KeyDiff { to_delete, .. } = KeyDiff::between(persisted, &incoming);

    CountryDiff {
        to_upsert: records.iter().filter(|r| !r.is_skipped()).collect(),
        to_delete,
    }
}
