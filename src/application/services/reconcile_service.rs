//! Reconciliation of the persisted listing against an incoming dataset.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use validator::Validate;

use crate::domain::diff;
use crate::domain::effect::{Effect, EffectAction, EntityKind};
use crate::domain::entities::{
    Country, CountryFields, CountryRecord, NewCountry, NewRegion, NewTopLevelDomain, Region,
    TopLevelDomain,
};
use crate::domain::repositories::{ListingStore, ListingTransaction};
use crate::domain::source::CountrySource;
use crate::error::AppError;

/// Options for a single run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Run every phase, then roll back instead of committing.
    pub dry_run: bool,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileReport {
    /// Effects in the order they were applied.
    pub effects: Vec<Effect>,
    pub dry_run: bool,
    pub records: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ReconcileReport {
    /// Number of effects for one entity type and action.
    pub fn count(&self, entity: EntityKind, action: EffectAction) -> usize {
        self.effects
            .iter()
            .filter(|e| e.entity == entity && e.action == action)
            .count()
    }

    /// Rendered effect lines, e.g. `Region: Asia - Created`.
    pub fn lines(&self) -> Vec<String> {
        self.effects.iter().map(Effect::to_string).collect()
    }
}

/// Ordered record of applied effects.
///
/// Each effect is logged as it happens. On rollback the logged lines do not
/// describe the final state; the returned error does.
#[derive(Default)]
struct EffectLog {
    effects: Vec<Effect>,
}

impl EffectLog {
    fn record(&mut self, entity: EntityKind, identity: &str, action: EffectAction) {
        let effect = Effect::new(entity, identity, action);

        info!(
            entity = entity.as_str(),
            identity = identity,
            action = action.as_str(),
            "{effect}"
        );
        metrics::counter!(
            "country_listing_effects_total",
            "entity" => entity.as_str(),
            "action" => action.as_str()
        )
        .increment(1);

        self.effects.push(effect);
    }
}

/// Service applying the country dataset to the store.
///
/// A run executes, in order and inside one transaction:
///
/// 1. Regions: create missing, delete unreferenced
/// 2. Top-level domains: create missing, delete unreferenced
/// 3. Countries: compute the delete set
/// 4. Countries: upsert every named record and replace its domain links
/// 5. Countries: delete names absent from the input
///
/// The transaction commits only if every phase succeeds; any error rolls
/// back all of them.
pub struct ReconcileService<S: ListingStore + ?Sized> {
    store: Arc<S>,
}

impl<S: ListingStore + ?Sized> ReconcileService<S> {
    /// Creates a new reconcile service.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Fetches the dataset from `source` and reconciles it.
    ///
    /// The fetch happens before the transaction is opened, so a failing
    /// source never touches the store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Upstream`] if the source fails, otherwise the
    /// errors of [`ReconcileService::reconcile`].
    pub async fn update_from_source(
        &self,
        source: &dyn CountrySource,
        options: ReconcileOptions,
    ) -> Result<ReconcileReport, AppError> {
        info!(source = %source.describe(), "Fetching country dataset");
        let records = source.fetch().await?;
        self.reconcile(&records, options).await
    }

    /// Makes the store mirror `records`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty region name, a missing
    /// population, or a region, domain or country field exceeding its
    /// column width.
    /// Returns [`AppError::Conflict`] on store constraint violations.
    /// Returns [`AppError::Internal`] on store failures.
    ///
    /// No change is persisted when an error is returned.
    pub async fn reconcile(
        &self,
        records: &[CountryRecord],
        options: ReconcileOptions,
    ) -> Result<ReconcileReport, AppError> {
        let started_at = Utc::now();
        info!(records = records.len(), dry_run = options.dry_run, "Reconciliation started");

        let mut tx = self.store.begin().await?;
        let mut log = EffectLog::default();

        if let Err(e) = apply(tx.as_mut(), records, &mut log).await {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Rollback failed; transaction will be dropped");
            }
            warn!(
                error = %e,
                discarded_effects = log.effects.len(),
                "Reconciliation failed, all changes rolled back"
            );
            metrics::counter!("country_listing_runs_total", "outcome" => "failed").increment(1);
            return Err(e);
        }

        if options.dry_run {
            tx.rollback().await?;
            info!(effects = log.effects.len(), "Dry run finished, changes rolled back");
            metrics::counter!("country_listing_runs_total", "outcome" => "dry_run").increment(1);
        } else {
            tx.commit().await?;
            info!(effects = log.effects.len(), "Reconciliation committed");
            metrics::counter!("country_listing_runs_total", "outcome" => "committed").increment(1);
        }

        Ok(ReconcileReport {
            effects: log.effects,
            dry_run: options.dry_run,
            records: records.len(),
            started_at,
            finished_at: Utc::now(),
        })
    }
}

async fn apply(
    tx: &mut dyn ListingTransaction,
    records: &[CountryRecord],
    log: &mut EffectLog,
) -> Result<(), AppError> {
    let regions = reconcile_regions(tx, records, log).await?;
    let top_level_domains = reconcile_top_level_domains(tx, records, log).await?;

    let existing: HashMap<String, Country> = tx
        .list_countries()
        .await?
        .into_iter()
        .map(|c| (c.name.clone(), c))
        .collect();
    let country_diff = diff::diff_countries(&existing, records);

    upsert_countries(
        tx,
        &country_diff.to_upsert,
        existing,
        &regions,
        &top_level_domains,
        log,
    )
    .await?;

    if !country_diff.to_delete.is_empty() {
        let names: Vec<String> = country_diff.to_delete.into_iter().collect();
        tx.delete_countries(&names).await?;
        for name in &names {
            log.record(EntityKind::Country, name, EffectAction::Deleted);
        }
    }

    Ok(())
}

/// Phase 1. Returns the name lookup including regions created in this run.
async fn reconcile_regions(
    tx: &mut dyn ListingTransaction,
    records: &[CountryRecord],
    log: &mut EffectLog,
) -> Result<HashMap<String, Region>, AppError> {
    let mut lookup: HashMap<String, Region> = tx
        .list_regions()
        .await?
        .into_iter()
        .map(|r| (r.name.clone(), r))
        .collect();

    let region_diff = diff::diff_regions(&lookup, records)?;

    for name in &region_diff.to_create {
        let new_region = NewRegion { name: name.clone() };
        new_region.validate()?;
        let region = tx.create_region(&new_region.name).await?;
        log.record(EntityKind::Region, &region.name, EffectAction::Created);
        lookup.insert(region.name.clone(), region);
    }

    if !region_diff.to_delete.is_empty() {
        let names: Vec<String> = region_diff.to_delete.into_iter().collect();
        tx.delete_regions(&names).await?;
        for name in &names {
            lookup.remove(name);
            log.record(EntityKind::Region, name, EffectAction::Deleted);
        }
    }

    Ok(lookup)
}

/// Phase 2. Same shape as phase 1; empty suffixes never reach the store.
async fn reconcile_top_level_domains(
    tx: &mut dyn ListingTransaction,
    records: &[CountryRecord],
    log: &mut EffectLog,
) -> Result<HashMap<String, TopLevelDomain>, AppError> {
    let mut lookup: HashMap<String, TopLevelDomain> = tx
        .list_top_level_domains()
        .await?
        .into_iter()
        .map(|t| (t.name.clone(), t))
        .collect();

    let tld_diff = diff::diff_top_level_domains(&lookup, records);

    for name in &tld_diff.to_create {
        let new_tld = NewTopLevelDomain { name: name.clone() };
        new_tld.validate()?;
        let tld = tx.create_top_level_domain(&new_tld.name).await?;
        log.record(EntityKind::TopLevelDomain, &tld.name, EffectAction::Created);
        lookup.insert(tld.name.clone(), tld);
    }

    if !tld_diff.to_delete.is_empty() {
        let names: Vec<String> = tld_diff.to_delete.into_iter().collect();
        tx.delete_top_level_domains(&names).await?;
        for name in &names {
            lookup.remove(name);
            log.record(EntityKind::TopLevelDomain, name, EffectAction::Deleted);
        }
    }

    Ok(lookup)
}

/// Phase 4. Later records with an already-seen name update that country.
async fn upsert_countries(
    tx: &mut dyn ListingTransaction,
    to_upsert: &[&CountryRecord],
    mut countries: HashMap<String, Country>,
    regions: &HashMap<String, Region>,
    top_level_domains: &HashMap<String, TopLevelDomain>,
    log: &mut EffectLog,
) -> Result<(), AppError> {
    for record in to_upsert {
        let fields = country_fields(record, regions)?;

        let (country, action) = match countries.get(&record.name) {
            Some(existing) => {
                fields.validate()?;
                (
                    tx.update_country(existing.id, fields).await?,
                    EffectAction::Updated,
                )
            }
            None => {
                let new_country = NewCountry {
                    name: record.name.clone(),
                    fields,
                };
                new_country.validate()?;
                (tx.create_country(new_country).await?, EffectAction::Created)
            }
        };
        log.record(EntityKind::Country, &country.name, action);

        // Links are replaced wholesale rather than diffed.
        tx.clear_country_domains(country.id).await?;
        for name in record.top_level_domains() {
            let tld = top_level_domains.get(name).ok_or_else(|| {
                AppError::internal(
                    "Top-level domain missing from lookup",
                    json!({ "country": record.name, "top_level_domain": name }),
                )
            })?;
            tx.add_country_domain(country.id, tld.id).await?;
        }

        countries.insert(country.name.clone(), country);
    }

    Ok(())
}

fn country_fields(
    record: &CountryRecord,
    regions: &HashMap<String, Region>,
) -> Result<CountryFields, AppError> {
    let population = record.population.ok_or_else(|| {
        AppError::bad_request(
            "Missing population",
            json!({ "country": record.name }),
        )
    })?;

    let region = regions.get(&record.region).ok_or_else(|| {
        AppError::internal(
            "Region missing from lookup",
            json!({ "country": record.name, "region": record.region }),
        )
    })?;

    Ok(CountryFields {
        alpha2_code: record.alpha2_code.clone(),
        alpha3_code: record.alpha3_code.clone(),
        population,
        capital: record.normalized_capital(),
        region_id: region.id,
    })
}
