#![allow(dead_code)]

use country_listing::application::services::{ReconcileOptions, ReconcileService};
use country_listing::domain::entities::CountryRecord;
use country_listing::domain::repositories::ReportRepository;
use country_listing::infrastructure::persistence::{MemoryListingStore, PgReportRepository};
use country_listing::state::AppState;
use sqlx::PgPool;
use std::sync::Arc;

pub fn record(
    name: &str,
    population: Option<i64>,
    region: &str,
    tlds: &[&str],
) -> CountryRecord {
    let code: String = name
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(3)
        .collect::<String>()
        .to_uppercase();

    CountryRecord {
        name: name.to_string(),
        alpha2_code: code.chars().take(2).collect(),
        alpha3_code: code,
        population,
        capital: None,
        region: region.to_string(),
        top_level_domain: tlds.iter().map(|t| t.to_string()).collect(),
    }
}

/// Three countries over two regions, one region without countries.
pub fn sample_records() -> Vec<CountryRecord> {
    vec![
        record("United Kingdom", Some(67_886_011), "Europe", &[".uk"]),
        record("Germany", Some(83_240_525), "Europe", &[".de"]),
        record("Japan", Some(126_476_461), "Asia", &[".jp"]),
    ]
}

pub async fn seeded_memory_store(records: &[CountryRecord]) -> Arc<MemoryListingStore> {
    let store = Arc::new(MemoryListingStore::new());
    ReconcileService::new(store.clone())
        .reconcile(records, ReconcileOptions::default())
        .await
        .unwrap();
    store
}

pub fn create_memory_state(store: Arc<MemoryListingStore>) -> AppState {
    AppState::new(store as Arc<dyn ReportRepository>)
}

pub fn create_test_state(pool: PgPool) -> AppState {
    AppState::new(Arc::new(PgReportRepository::new(Arc::new(pool))))
}

pub async fn create_test_region(pool: &PgPool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO regions (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
