mod common;

use country_listing::AppError;
use country_listing::domain::entities::{CountryFields, NewCountry};
use country_listing::domain::repositories::{ListingStore, ReportRepository};
use country_listing::infrastructure::persistence::{PgListingStore, PgReportRepository};
use sqlx::PgPool;
use std::sync::Arc;

fn fields(population: i64, region_id: i64) -> CountryFields {
    CountryFields {
        alpha2_code: "GB".to_string(),
        alpha3_code: "GBR".to_string(),
        population,
        capital: Some("London".to_string()),
        region_id,
    }
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_commit_makes_rows_visible(pool: PgPool) {
    let store = PgListingStore::new(Arc::new(pool.clone()));

    let mut tx = store.begin().await.unwrap();
    let region = tx.create_region("Europe").await.unwrap();
    let tld = tx.create_top_level_domain(".uk").await.unwrap();
    let country = tx
        .create_country(NewCountry {
            name: "United Kingdom".to_string(),
            fields: fields(67_886_011, region.id),
        })
        .await
        .unwrap();
    tx.add_country_domain(country.id, tld.id).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(common::count_rows(&pool, "regions").await, 1);
    assert_eq!(common::count_rows(&pool, "countries").await, 1);
    assert_eq!(common::count_rows(&pool, "country_top_level_domains").await, 1);

    let mut tx = store.begin().await.unwrap();
    assert_eq!(tx.country_domains(country.id).await.unwrap(), vec![".uk"]);
    let countries = tx.list_countries().await.unwrap();
    assert_eq!(countries[0].capital.as_deref(), Some("London"));
    tx.rollback().await.unwrap();
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_rollback_and_drop_discard_changes(pool: PgPool) {
    let store = PgListingStore::new(Arc::new(pool.clone()));

    let mut tx = store.begin().await.unwrap();
    tx.create_region("Europe").await.unwrap();
    tx.rollback().await.unwrap();

    {
        let mut tx = store.begin().await.unwrap();
        tx.create_region("Asia").await.unwrap();
    }

    assert_eq!(common::count_rows(&pool, "regions").await, 0);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_duplicate_region_is_conflict(pool: PgPool) {
    let store = PgListingStore::new(Arc::new(pool));

    let mut tx = store.begin().await.unwrap();
    tx.create_region("Europe").await.unwrap();
    let result = tx.create_region("Europe").await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_update_country_overwrites_fields(pool: PgPool) {
    let store = PgListingStore::new(Arc::new(pool));

    let mut tx = store.begin().await.unwrap();
    let region = tx.create_region("Europe").await.unwrap();
    let country = tx
        .create_country(NewCountry {
            name: "United Kingdom".to_string(),
            fields: fields(1, region.id),
        })
        .await
        .unwrap();

    let mut updated_fields = fields(67_886_012, region.id);
    updated_fields.capital = None;
    let updated = tx.update_country(country.id, updated_fields).await.unwrap();

    assert_eq!(updated.id, country.id);
    assert_eq!(updated.population, 67_886_012);
    assert!(updated.capital.is_none());

    let missing = tx.update_country(country.id + 1000, fields(1, region.id)).await;
    assert!(matches!(missing, Err(AppError::NotFound { .. })));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_region_delete_cascades(pool: PgPool) {
    let store = PgListingStore::new(Arc::new(pool.clone()));

    let mut tx = store.begin().await.unwrap();
    let region = tx.create_region("Europe").await.unwrap();
    let tld = tx.create_top_level_domain(".uk").await.unwrap();
    let country = tx
        .create_country(NewCountry {
            name: "United Kingdom".to_string(),
            fields: fields(1, region.id),
        })
        .await
        .unwrap();
    tx.add_country_domain(country.id, tld.id).await.unwrap();

    let removed = tx.delete_regions(&["Europe".to_string()]).await.unwrap();
    assert_eq!(removed, 1);
    assert!(tx.list_countries().await.unwrap().is_empty());
    tx.commit().await.unwrap();

    assert_eq!(common::count_rows(&pool, "country_top_level_domains").await, 0);
    assert_eq!(common::count_rows(&pool, "top_level_domains").await, 1);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_clear_country_domains(pool: PgPool) {
    let store = PgListingStore::new(Arc::new(pool));

    let mut tx = store.begin().await.unwrap();
    let region = tx.create_region("Europe").await.unwrap();
    let uk = tx.create_top_level_domain(".uk").await.unwrap();
    let gb = tx.create_top_level_domain(".gb").await.unwrap();
    let country = tx
        .create_country(NewCountry {
            name: "United Kingdom".to_string(),
            fields: fields(1, region.id),
        })
        .await
        .unwrap();

    tx.add_country_domain(country.id, uk.id).await.unwrap();
    tx.add_country_domain(country.id, gb.id).await.unwrap();
    tx.add_country_domain(country.id, gb.id).await.unwrap();
    assert_eq!(
        tx.country_domains(country.id).await.unwrap(),
        vec![".gb", ".uk"]
    );

    tx.clear_country_domains(country.id).await.unwrap();
    assert!(tx.country_domains(country.id).await.unwrap().is_empty());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_region_stats(pool: PgPool) {
    let store = PgListingStore::new(Arc::new(pool.clone()));

    let mut tx = store.begin().await.unwrap();
    let europe = tx.create_region("Europe").await.unwrap();
    tx.create_region("Americas").await.unwrap();
    for (name, population) in [("United Kingdom", 67_886_011), ("Germany", 83_240_525)] {
        tx.create_country(NewCountry {
            name: name.to_string(),
            fields: fields(population, europe.id),
        })
        .await
        .unwrap();
    }
    tx.commit().await.unwrap();

    let repo = PgReportRepository::new(Arc::new(pool));
    let stats = repo.region_stats().await.unwrap();

    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].name, "Americas");
    assert_eq!(stats[0].number_countries, 0);
    assert_eq!(stats[0].total_population, None);
    assert_eq!(stats[1].name, "Europe");
    assert_eq!(stats[1].number_countries, 2);
    assert_eq!(stats[1].total_population, Some(151_126_536));

    assert!(repo.ping().await);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_over_wide_names_are_validation_errors(pool: PgPool) {
    let store = PgListingStore::new(Arc::new(pool));

    let mut tx = store.begin().await.unwrap();
    let result = tx.create_region(&"R".repeat(101)).await;
    assert!(matches!(result, Err(AppError::Validation { .. })));

    let mut tx = store.begin().await.unwrap();
    let result = tx
        .create_top_level_domain(&format!(".{}", "x".repeat(63)))
        .await;
    assert!(matches!(result, Err(AppError::Validation { .. })));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_region_stats_sorted_by_code_point(pool: PgPool) {
    for name in ["Åland", "europe", "Zeta"] {
        common::create_test_region(&pool, name).await;
    }

    let repo = PgReportRepository::new(Arc::new(pool));
    let names: Vec<String> = repo
        .region_stats()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();

    assert_eq!(names, vec!["Zeta", "europe", "Åland"]);
}
