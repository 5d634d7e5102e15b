//! PostgreSQL implementation of the transactional listing store.

use async_trait::async_trait;
use serde_json::json;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use std::sync::Arc;

use crate::domain::entities::{Country, CountryFields, NewCountry, Region, TopLevelDomain};
use crate::domain::repositories::{ListingStore, ListingTransaction};
use crate::error::AppError;

/// PostgreSQL store backing the reconciler.
///
/// Each [`ListingStore::begin`] call checks a connection out of the pool and
/// opens a database transaction on it at the default isolation level.
pub struct PgListingStore {
    pool: Arc<PgPool>,
}

impl PgListingStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingStore for PgListingStore {
    async fn begin(&self) -> Result<Box<dyn ListingTransaction>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgListingTransaction { tx: Some(tx) }))
    }
}

/// An open PostgreSQL transaction.
///
/// Dropping it before [`ListingTransaction::commit`] rolls the transaction
/// back when the connection returns to the pool.
pub struct PgListingTransaction {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgListingTransaction {
    fn conn(&mut self) -> Result<&mut PgConnection, AppError> {
        self.tx.as_deref_mut().ok_or_else(finished)
    }
}

fn finished() -> AppError {
    AppError::internal("Transaction already finished", json!({}))
}

#[derive(sqlx::FromRow)]
struct NamedRow {
    id: i64,
    name: String,
}

#[derive(sqlx::FromRow)]
struct CountryRow {
    id: i64,
    name: String,
    alpha2_code: String,
    alpha3_code: String,
    population: i64,
    capital: Option<String>,
    region_id: i64,
}

impl From<CountryRow> for Country {
    fn from(r: CountryRow) -> Self {
        Country {
            id: r.id,
            name: r.name,
            alpha2_code: r.alpha2_code,
            alpha3_code: r.alpha3_code,
            population: r.population,
            capital: r.capital,
            region_id: r.region_id,
        }
    }
}

#[async_trait]
impl ListingTransaction for PgListingTransaction {
    async fn list_regions(&mut self) -> Result<Vec<Region>, AppError> {
        let rows = sqlx::query_as::<_, NamedRow>("SELECT id, name FROM regions ORDER BY name")
            .fetch_all(self.conn()?)
            .await?;

        Ok(rows.into_iter().map(|r| Region::new(r.id, r.name)).collect())
    }

    async fn create_region(&mut self, name: &str) -> Result<Region, AppError> {
        let row = sqlx::query_as::<_, NamedRow>(
            "INSERT INTO regions (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(self.conn()?)
        .await?;

        Ok(Region::new(row.id, row.name))
    }

    async fn delete_regions(&mut self, names: &[String]) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM regions WHERE name = ANY($1)")
            .bind(names)
            .execute(self.conn()?)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_top_level_domains(&mut self) -> Result<Vec<TopLevelDomain>, AppError> {
        let rows = sqlx::query_as::<_, NamedRow>(
            "SELECT id, name FROM top_level_domains ORDER BY name",
        )
        .fetch_all(self.conn()?)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| TopLevelDomain::new(r.id, r.name))
            .collect())
    }

    async fn create_top_level_domain(&mut self, name: &str) -> Result<TopLevelDomain, AppError> {
        let row = sqlx::query_as::<_, NamedRow>(
            "INSERT INTO top_level_domains (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(self.conn()?)
        .await?;

        Ok(TopLevelDomain::new(row.id, row.name))
    }

    async fn delete_top_level_domains(&mut self, names: &[String]) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM top_level_domains WHERE name = ANY($1)")
            .bind(names)
            .execute(self.conn()?)
            .await?;

        Ok(result.rows_affected())
    }

    async fn list_countries(&mut self) -> Result<Vec<Country>, AppError> {
        let rows = sqlx::query_as::<_, CountryRow>(
            r#"
            SELECT id, name, alpha2_code, alpha3_code, population, capital, region_id
            FROM countries
            ORDER BY name
            "#,
        )
        .fetch_all(self.conn()?)
        .await?;

        Ok(rows.into_iter().map(Country::from).collect())
    }

    async fn create_country(&mut self, new_country: NewCountry) -> Result<Country, AppError> {
        let NewCountry { name, fields } = new_country;

        let row = sqlx::query_as::<_, CountryRow>(
            r#"
            INSERT INTO countries (name, alpha2_code, alpha3_code, population, capital, region_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, alpha2_code, alpha3_code, population, capital, region_id
            "#,
        )
        .bind(name)
        .bind(fields.alpha2_code)
        .bind(fields.alpha3_code)
        .bind(fields.population)
        .bind(fields.capital)
        .bind(fields.region_id)
        .fetch_one(self.conn()?)
        .await?;

        Ok(row.into())
    }

    async fn update_country(
        &mut self,
        id: i64,
        fields: CountryFields,
    ) -> Result<Country, AppError> {
        let row = sqlx::query_as::<_, CountryRow>(
            r#"
            UPDATE countries SET
                alpha2_code = $2,
                alpha3_code = $3,
                population  = $4,
                capital     = $5,
                region_id   = $6,
                updated_at  = NOW()
            WHERE id = $1
            RETURNING id, name, alpha2_code, alpha3_code, population, capital, region_id
            "#,
        )
        .bind(id)
        .bind(fields.alpha2_code)
        .bind(fields.alpha3_code)
        .bind(fields.population)
        .bind(fields.capital)
        .bind(fields.region_id)
        .fetch_optional(self.conn()?)
        .await?;

        row.map(Country::from)
            .ok_or_else(|| AppError::not_found("Country not found", json!({ "id": id })))
    }

    async fn clear_country_domains(&mut self, country_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM country_top_level_domains WHERE country_id = $1")
            .bind(country_id)
            .execute(self.conn()?)
            .await?;

        Ok(())
    }

    async fn add_country_domain(
        &mut self,
        country_id: i64,
        top_level_domain_id: i64,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO country_top_level_domains (country_id, top_level_domain_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(country_id)
        .bind(top_level_domain_id)
        .execute(self.conn()?)
        .await?;

        Ok(())
    }

    async fn country_domains(&mut self, country_id: i64) -> Result<Vec<String>, AppError> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT t.name
            FROM country_top_level_domains ct
            JOIN top_level_domains t ON t.id = ct.top_level_domain_id
            WHERE ct.country_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(country_id)
        .fetch_all(self.conn()?)
        .await?;

        Ok(names)
    }

    async fn delete_countries(&mut self, names: &[String]) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM countries WHERE name = ANY($1)")
            .bind(names)
            .execute(self.conn()?)
            .await?;

        Ok(result.rows_affected())
    }

    async fn commit(&mut self) -> Result<(), AppError> {
        let tx = self.tx.take().ok_or_else(finished)?;
        tx.commit().await?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), AppError> {
        let tx = self.tx.take().ok_or_else(finished)?;
        tx.rollback().await?;
        Ok(())
    }
}
