//! Persistent city store using PostgreSQL.

use crate::domain::city::{CityId, CityPatch, CityRecord, NewCity};
use crate::storage::{CityStore, StoreError};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

const SELECT_COLUMNS: &str = "SELECT id, name, state, country, tourist_rating, date_established, \
     estimated_population, country_2digit_code, country_3digit_code, currency_code, \
     country_data, weather FROM cities";

/// A city store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PostgresCityStore {
    pool: PgPool,
}

impl PostgresCityStore {
    /// Connects to `database_url` and makes sure the `cities` table exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Self::new_with_pool(pool).await
    }

    pub async fn new_with_pool(pool: PgPool) -> Result<Self, StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS cities (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                state TEXT,
                country TEXT NOT NULL,
                tourist_rating INTEGER,
                date_established TEXT,
                estimated_population BIGINT,
                country_2digit_code TEXT NOT NULL,
                country_3digit_code TEXT NOT NULL,
                currency_code TEXT NOT NULL,
                country_data TEXT NOT NULL,
                weather TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn row_to_city(row: &PgRow) -> Result<CityRecord, sqlx::Error> {
    Ok(CityRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        state: row.try_get("state")?,
        country: row.try_get("country")?,
        tourist_rating: row.try_get("tourist_rating")?,
        date_established: row.try_get("date_established")?,
        estimated_population: row.try_get("estimated_population")?,
        country_2digit_code: row.try_get("country_2digit_code")?,
        country_3digit_code: row.try_get("country_3digit_code")?,
        currency_code: row.try_get("currency_code")?,
        country_data: row.try_get("country_data")?,
        weather: row.try_get("weather")?,
    })
}

/// Builds an `ILIKE` pattern matching `query` literally anywhere in the value.
pub(crate) fn contains_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl CityStore for PostgresCityStore {
    async fn create(&self, city: NewCity) -> Result<CityId, StoreError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO cities (name, state, country, tourist_rating, date_established,
                estimated_population, country_2digit_code, country_3digit_code, currency_code,
                country_data, weather)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING id",
        )
        .bind(&city.name)
        .bind(&city.state)
        .bind(&city.country)
        .bind(city.tourist_rating)
        .bind(&city.date_established)
        .bind(city.estimated_population)
        .bind(&city.country_2digit_code)
        .bind(&city.country_3digit_code)
        .bind(&city.currency_code)
        .bind(&city.country_data)
        .bind(&city.weather)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn get_all(&self) -> Result<Vec<CityRecord>, StoreError> {
        let rows = sqlx::query(&format!("{} ORDER BY id", SELECT_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_city).collect::<Result<Vec<_>, _>>()?)
    }

    async fn get_by_id(&self, id: CityId) -> Result<Option<CityRecord>, StoreError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_city).transpose()?)
    }

    async fn update(&self, id: CityId, patch: &CityPatch) -> Result<CityRecord, StoreError> {
        if patch.is_empty() {
            return self.get_by_id(id).await?.ok_or(StoreError::NotFound(id));
        }

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE cities SET ");
        let mut fields = qb.separated(", ");
        if let Some(rating) = patch.tourist_rating {
            fields.push("tourist_rating = ").push_bind_unseparated(rating);
        }
        if let Some(date) = &patch.date_established {
            fields
                .push("date_established = ")
                .push_bind_unseparated(date.clone());
        }
        if let Some(population) = patch.estimated_population {
            fields
                .push("estimated_population = ")
                .push_bind_unseparated(population);
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING id, name, state, country, tourist_rating, date_established, \
                 estimated_population, country_2digit_code, country_3digit_code, currency_code, \
                 country_data, weather");

        let row = qb
            .build()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))?;
        Ok(row_to_city(&row)?)
    }

    async fn delete(&self, id: CityId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM cities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn find_by_name_substring(&self, query: &str) -> Result<Vec<CityRecord>, StoreError> {
        let rows = sqlx::query(&format!(
            "{} WHERE name ILIKE $1 ESCAPE '\\' ORDER BY id",
            SELECT_COLUMNS
        ))
        .bind(contains_pattern(query))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(row_to_city).collect::<Result<Vec<_>, _>>()?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_wraps_plain_text() {
        assert_eq!(contains_pattern("york"), "%york%");
    }

    #[test]
    fn pattern_escapes_like_wildcards() {
        assert_eq!(contains_pattern("50%_a\\b"), "%50\\%\\_a\\\\b%");
    }
}
