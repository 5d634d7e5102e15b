//! In-memory store for tests and local experiments.
//!
//! Mirrors the relational rules of the PostgreSQL schema: unique names,
//! mandatory regions and cascading deletes. Transactions work on a private
//! snapshot taken at `begin` and publish it on `commit`; concurrent
//! transactions are not isolated from each other beyond last-writer-wins.

use async_trait::async_trait;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::entities::{Country, CountryFields, NewCountry, Region, TopLevelDomain};
use crate::domain::repositories::{
    ListingStore, ListingTransaction, RegionStats, ReportRepository,
};
use crate::error::AppError;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    next_id: i64,
    regions: BTreeMap<i64, Region>,
    top_level_domains: BTreeMap<i64, TopLevelDomain>,
    countries: BTreeMap<i64, Country>,
    links: BTreeSet<(i64, i64)>,
}

impl MemoryState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_unique<'a>(
        table: &str,
        mut names: impl Iterator<Item = &'a String>,
        name: &str,
    ) -> Result<(), AppError> {
        if name.is_empty() {
            return Err(AppError::conflict(
                "Constraint violation",
                json!({ "constraint": format!("{table}_name_check") }),
            ));
        }
        if names.any(|n| n == name) {
            return Err(AppError::conflict(
                "Constraint violation",
                json!({ "constraint": format!("{table}_name_key"), "name": name }),
            ));
        }
        Ok(())
    }

    /// Mirrors `VARCHAR(n)`, which counts characters.
    fn require_width(column: &str, value: &str, max: usize) -> Result<(), AppError> {
        if value.chars().count() > max {
            return Err(AppError::bad_request(
                "Value too long",
                json!({ "column": column, "max_length": max }),
            ));
        }
        Ok(())
    }

    fn require_region(&self, region_id: i64) -> Result<(), AppError> {
        if self.regions.contains_key(&region_id) {
            Ok(())
        } else {
            Err(AppError::conflict(
                "Constraint violation",
                json!({ "constraint": "countries_region_id_fkey", "region_id": region_id }),
            ))
        }
    }

    fn remove_countries(&mut self, ids: &BTreeSet<i64>) {
        self.countries.retain(|id, _| !ids.contains(id));
        self.links.retain(|(country_id, _)| !ids.contains(country_id));
    }
}

/// Store keeping every table in process memory.
#[derive(Clone, Default)]
pub struct MemoryListingStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryListingStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        debug!("Using in-memory listing store");
        Self::default()
    }
}

#[async_trait]
impl ListingStore for MemoryListingStore {
    async fn begin(&self) -> Result<Box<dyn ListingTransaction>, AppError> {
        let working = self.state.lock().await.clone();
        Ok(Box::new(MemoryTransaction {
            working,
            target: Arc::clone(&self.state),
            finished: false,
        }))
    }
}

#[async_trait]
impl ReportRepository for MemoryListingStore {
    async fn region_stats(&self) -> Result<Vec<RegionStats>, AppError> {
        let state = self.state.lock().await;

        let mut stats: Vec<RegionStats> = state
            .regions
            .values()
            .map(|region| {
                let populations: Vec<i64> = state
                    .countries
                    .values()
                    .filter(|c| c.region_id == region.id)
                    .map(|c| c.population)
                    .collect();

                RegionStats {
                    name: region.name.clone(),
                    number_countries: populations.len() as i64,
                    total_population: if populations.is_empty() {
                        None
                    } else {
                        Some(populations.iter().sum())
                    },
                }
            })
            .collect();

        stats.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(stats)
    }

    async fn ping(&self) -> bool {
        true
    }
}

/// Transaction over a private copy of the store.
pub struct MemoryTransaction {
    working: MemoryState,
    target: Arc<Mutex<MemoryState>>,
    finished: bool,
}

impl MemoryTransaction {
    fn state(&mut self) -> Result<&mut MemoryState, AppError> {
        if self.finished {
            return Err(AppError::internal("Transaction already finished", json!({})));
        }
        Ok(&mut self.working)
    }
}

#[async_trait]
impl ListingTransaction for MemoryTransaction {
    async fn list_regions(&mut self) -> Result<Vec<Region>, AppError> {
        Ok(self.state()?.regions.values().cloned().collect())
    }

    async fn create_region(&mut self, name: &str) -> Result<Region, AppError> {
        let state = self.state()?;
        MemoryState::require_width("regions.name", name, 100)?;
        MemoryState::require_unique("regions", state.regions.values().map(|r| &r.name), name)?;

        let region = Region::new(state.allocate_id(), name.to_string());
        state.regions.insert(region.id, region.clone());
        Ok(region)
    }

    async fn delete_regions(&mut self, names: &[String]) -> Result<u64, AppError> {
        let state = self.state()?;

        let ids: BTreeSet<i64> = state
            .regions
            .values()
            .filter(|r| names.contains(&r.name))
            .map(|r| r.id)
            .collect();

        let cascaded: BTreeSet<i64> = state
            .countries
            .values()
            .filter(|c| ids.contains(&c.region_id))
            .map(|c| c.id)
            .collect();

        state.regions.retain(|id, _| !ids.contains(id));
        state.remove_countries(&cascaded);
        Ok(ids.len() as u64)
    }

    async fn list_top_level_domains(&mut self) -> Result<Vec<TopLevelDomain>, AppError> {
        Ok(self.state()?.top_level_domains.values().cloned().collect())
    }

    async fn create_top_level_domain(&mut self, name: &str) -> Result<TopLevelDomain, AppError> {
        let state = self.state()?;
        MemoryState::require_width("top_level_domains.name", name, 63)?;
        MemoryState::require_unique(
            "top_level_domains",
            state.top_level_domains.values().map(|t| &t.name),
            name,
        )?;

        let tld = TopLevelDomain::new(state.allocate_id(), name.to_string());
        state.top_level_domains.insert(tld.id, tld.clone());
        Ok(tld)
    }

    async fn delete_top_level_domains(&mut self, names: &[String]) -> Result<u64, AppError> {
        let state = self.state()?;

        let ids: BTreeSet<i64> = state
            .top_level_domains
            .values()
            .filter(|t| names.contains(&t.name))
            .map(|t| t.id)
            .collect();

        state.top_level_domains.retain(|id, _| !ids.contains(id));
        state.links.retain(|(_, tld_id)| !ids.contains(tld_id));
        Ok(ids.len() as u64)
    }

    async fn list_countries(&mut self) -> Result<Vec<Country>, AppError> {
        Ok(self.state()?.countries.values().cloned().collect())
    }

    async fn create_country(&mut self, new_country: NewCountry) -> Result<Country, AppError> {
        let state = self.state()?;
        MemoryState::require_width("countries.name", &new_country.name, 100)?;
        MemoryState::require_unique(
            "countries",
            state.countries.values().map(|c| &c.name),
            &new_country.name,
        )?;
        state.require_region(new_country.fields.region_id)?;

        let country = Country::from_fields(state.allocate_id(), new_country.name, new_country.fields);
        state.countries.insert(country.id, country.clone());
        Ok(country)
    }

    async fn update_country(
        &mut self,
        id: i64,
        fields: CountryFields,
    ) -> Result<Country, AppError> {
        let state = self.state()?;
        state.require_region(fields.region_id)?;

        let country = state
            .countries
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Country not found", json!({ "id": id })))?;
        country.apply(fields);
        Ok(country.clone())
    }

    async fn clear_country_domains(&mut self, country_id: i64) -> Result<(), AppError> {
        self.state()?
            .links
            .retain(|(linked_country, _)| *linked_country != country_id);
        Ok(())
    }

    async fn add_country_domain(
        &mut self,
        country_id: i64,
        top_level_domain_id: i64,
    ) -> Result<(), AppError> {
        let state = self.state()?;

        if !state.countries.contains_key(&country_id)
            || !state.top_level_domains.contains_key(&top_level_domain_id)
        {
            return Err(AppError::conflict(
                "Constraint violation",
                json!({
                    "constraint": "country_top_level_domains_fkey",
                    "country_id": country_id,
                    "top_level_domain_id": top_level_domain_id,
                }),
            ));
        }

        state.links.insert((country_id, top_level_domain_id));
        Ok(())
    }

    async fn country_domains(&mut self, country_id: i64) -> Result<Vec<String>, AppError> {
        let state = self.state()?;

        let mut names: Vec<String> = state
            .links
            .iter()
            .filter(|(linked_country, _)| *linked_country == country_id)
            .filter_map(|(_, tld_id)| state.top_level_domains.get(tld_id))
            .map(|t| t.name.clone())
            .collect();

        names.sort();
        Ok(names)
    }

    async fn delete_countries(&mut self, names: &[String]) -> Result<u64, AppError> {
        let state = self.state()?;

        let ids: BTreeSet<i64> = state
            .countries
            .values()
            .filter(|c| names.contains(&c.name))
            .map(|c| c.id)
            .collect();

        state.remove_countries(&ids);
        Ok(ids.len() as u64)
    }

    async fn commit(&mut self) -> Result<(), AppError> {
        let working = std::mem::take(self.state()?);
        *self.target.lock().await = working;
        self.finished = true;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), AppError> {
        self.state()?;
        self.finished = true;
        Ok(())
    }
}
