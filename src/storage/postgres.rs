//! PostgreSQL store adapter.
//!
//! Lowers the store-agnostic predicate form to SQL text with `$n`
//! placeholders and typed binds, and realizes the transactional pieces of
//! the store contract with native sqlx transactions. The case-insensitive
//! substring operator of this dialect is `ILIKE`.

use crate::domain::model::{Car, CarId, Construction, ConstructionId, NewCar};
use crate::infra::config;
use crate::query::predicate::{Clause, Predicate, Scalar};
use crate::storage::store::CarStore;
use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::collections::BTreeSet;
use tracing::debug;

const CREATE_CONSTRUCTION_SQL: &str = "CREATE TABLE IF NOT EXISTS construction (
    id BIGSERIAL PRIMARY KEY,
    model VARCHAR(32) UNIQUE NOT NULL,
    variant VARCHAR(16) NOT NULL
)";

// The tag set is persisted as a single comma-delimited column, which keeps
// tag filtering a plain LIKE over the flattened value.
const CREATE_CAR_SQL: &str = "CREATE TABLE IF NOT EXISTS car (
    id BIGSERIAL PRIMARY KEY,
    version BIGINT NOT NULL DEFAULT 0,
    vin VARCHAR(17) UNIQUE NOT NULL,
    rating SMALLINT NOT NULL,
    engine VARCHAR(12) NOT NULL,
    price DOUBLE PRECISION NOT NULL,
    discount DOUBLE PRECISION NOT NULL,
    available BOOLEAN NOT NULL,
    release_date DATE NOT NULL,
    homepage VARCHAR(40) NOT NULL,
    tags TEXT NOT NULL,
    construction_id BIGINT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)";

const SELECT_CARS: &str = "SELECT car.id, car.version, car.vin, car.rating, car.engine, \
    car.price, car.discount, car.available, car.release_date, car.homepage, car.tags, \
    car.created_at, car.updated_at, \
    construction.id AS construction_id, construction.model, construction.variant \
    FROM car JOIN construction ON construction.id = car.construction_id";

/// A car store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PostgresCarStore {
    pool: PgPool,
}

impl PostgresCarStore {
    /// Connects using the environment configuration and bootstraps the
    /// schema.
    pub async fn connect() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        let pool = PgPoolOptions::new()
            .max_connections(config::database_max_connections())
            .connect(&config::database_url())
            .await?;
        Self::new_with_pool(pool).await
    }

    /// Wraps an existing pool and bootstraps the schema.
    pub async fn new_with_pool(pool: PgPool) -> anyhow::Result<Self> {
        sqlx::query(CREATE_CONSTRUCTION_SQL).execute(&pool).await?;
        sqlx::query(CREATE_CAR_SQL).execute(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CarStore for PostgresCarStore {
    async fn fetch_one(&self, predicate: &Predicate) -> anyhow::Result<Option<Car>> {
        let (where_sql, binds) = lower(predicate);
        let sql = format!("{SELECT_CARS}{where_sql}");
        debug!(%sql, "fetch_one");
        let row = bind_scalars(sqlx::query(&sql), &binds)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(car_from_row).transpose()
    }

    async fn fetch_all(&self, predicate: &Predicate) -> anyhow::Result<Vec<Car>> {
        let (where_sql, binds) = lower(predicate);
        let sql = format!("{SELECT_CARS}{where_sql}");
        debug!(%sql, "fetch_all");
        let rows = bind_scalars(sqlx::query(&sql), &binds)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(car_from_row).collect()
    }

    async fn insert(&self, car: NewCar) -> anyhow::Result<Car> {
        let mut transaction = self.pool.begin().await?;

        let construction_id: ConstructionId = sqlx::query_scalar(
            "INSERT INTO construction (model, variant) VALUES ($1, $2) RETURNING id",
        )
        .bind(&car.construction.model)
        .bind(&car.construction.variant)
        .fetch_one(&mut *transaction)
        .await?;

        let row = sqlx::query(
            "INSERT INTO car (vin, rating, engine, price, discount, available, \
             release_date, homepage, tags, construction_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING id, version, created_at, updated_at",
        )
        .bind(&car.attrs.vin)
        .bind(car.attrs.rating)
        .bind(car.attrs.engine.as_str())
        .bind(car.attrs.price)
        .bind(car.attrs.discount)
        .bind(car.attrs.available)
        .bind(car.attrs.release_date)
        .bind(&car.attrs.homepage)
        .bind(join_tags(&car.attrs.tags))
        .bind(construction_id)
        .fetch_one(&mut *transaction)
        .await?;

        transaction.commit().await?;

        let NewCar {
            attrs,
            construction,
        } = car;
        Ok(Car {
            id: row.try_get("id")?,
            version: row.try_get("version")?,
            vin: attrs.vin,
            rating: attrs.rating,
            engine: attrs.engine,
            price: attrs.price,
            discount: attrs.discount,
            available: attrs.available,
            release_date: attrs.release_date,
            homepage: attrs.homepage,
            tags: attrs.tags,
            construction: Construction {
                id: construction_id,
                model: construction.model,
                variant: construction.variant,
            },
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    async fn update(&self, car: &Car) -> anyhow::Result<Option<Car>> {
        // Guard and increment live in one statement, so the version check is
        // atomic with the write.
        let row = sqlx::query(
            "UPDATE car SET vin = $1, rating = $2, engine = $3, price = $4, discount = $5, \
             available = $6, release_date = $7, homepage = $8, tags = $9, \
             version = version + 1, updated_at = now() \
             WHERE id = $10 AND version = $11 \
             RETURNING version, updated_at",
        )
        .bind(&car.vin)
        .bind(car.rating)
        .bind(car.engine.as_str())
        .bind(car.price)
        .bind(car.discount)
        .bind(car.available)
        .bind(car.release_date)
        .bind(&car.homepage)
        .bind(join_tags(&car.tags))
        .bind(car.id)
        .bind(car.version)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            None => Ok(None),
            Some(row) => {
                let mut updated = car.clone();
                updated.version = row.try_get("version")?;
                updated.updated_at = row.try_get("updated_at")?;
                Ok(Some(updated))
            }
        }
    }

    async fn delete(&self, id: CarId, construction_id: ConstructionId) -> anyhow::Result<u64> {
        let mut transaction = self.pool.begin().await?;

        sqlx::query("DELETE FROM construction WHERE id = $1")
            .bind(construction_id)
            .execute(&mut *transaction)
            .await?;
        let affected = sqlx::query("DELETE FROM car WHERE id = $1")
            .bind(id)
            .execute(&mut *transaction)
            .await?
            .rows_affected();

        transaction.commit().await?;
        Ok(affected)
    }
}

/// Lowers a predicate to a WHERE fragment plus its binds, in clause order.
fn lower(predicate: &Predicate) -> (String, Vec<Scalar>) {
    let mut fragments = Vec::new();
    let mut binds: Vec<Scalar> = Vec::new();

    for clause in predicate.clauses() {
        let n = binds.len() + 1;
        match clause {
            Clause::IdIs(id) => {
                fragments.push(format!("car.id = ${n}"));
                binds.push(Scalar::Int(*id));
            }
            Clause::ModelContains(needle) => {
                fragments.push(format!("construction.model ILIKE ${n}"));
                binds.push(Scalar::Text(format!("%{needle}%")));
            }
            Clause::HasTag(keyword) => {
                fragments.push(format!("car.tags LIKE ${n}"));
                binds.push(Scalar::Text(format!("%{keyword}%")));
            }
            Clause::Eq(field, scalar) => {
                fragments.push(format!("car.{} = ${n}", field.column()));
                binds.push(scalar.clone());
            }
        }
    }

    if fragments.is_empty() {
        (String::new(), binds)
    } else {
        (format!(" WHERE {}", fragments.join(" AND ")), binds)
    }
}

fn bind_scalars<'q>(
    mut query: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    binds: &[Scalar],
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    for scalar in binds {
        query = match scalar {
            Scalar::Int(v) => query.bind(*v),
            Scalar::Float(v) => query.bind(*v),
            Scalar::Bool(v) => query.bind(*v),
            Scalar::Text(v) => query.bind(v.clone()),
            Scalar::Date(v) => query.bind(*v),
        };
    }
    query
}

fn car_from_row(row: &PgRow) -> anyhow::Result<Car> {
    let engine: String = row.try_get("engine")?;
    let tags: String = row.try_get("tags")?;
    Ok(Car {
        id: row.try_get("id")?,
        version: row.try_get("version")?,
        vin: row.try_get("vin")?,
        rating: row.try_get("rating")?,
        engine: engine.parse()?,
        price: row.try_get("price")?,
        discount: row.try_get("discount")?,
        available: row.try_get("available")?,
        release_date: row.try_get("release_date")?,
        homepage: row.try_get("homepage")?,
        tags: split_tags(&tags),
        construction: Construction {
            id: row.try_get("construction_id")?,
            model: row.try_get("model")?,
            variant: row.try_get("variant")?,
        },
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn join_tags(tags: &BTreeSet<String>) -> String {
    tags.iter().cloned().collect::<Vec<_>>().join(",")
}

fn split_tags(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::criteria::Criteria;
    use crate::query::translator::{translate_lookup, translate_search};

    #[test]
    fn lookup_lowers_to_an_id_guard() {
        let (where_sql, binds) = lower(&translate_lookup(7));
        assert_eq!(where_sql, " WHERE car.id = $1");
        assert_eq!(binds, vec![Scalar::Int(7)]);
    }

    #[test]
    fn unconstrained_predicate_has_no_where() {
        let (where_sql, binds) = lower(&Predicate::unconstrained());
        assert_eq!(where_sql, "");
        assert!(binds.is_empty());
    }

    #[test]
    fn search_lowering_keeps_clause_order_and_bind_numbering() {
        let criteria = Criteria::new()
            .with("construction", "kom")
            .with("mercedes", "true")
            .with("rating", 5);
        let predicate = translate_search(&criteria).unwrap();
        let (where_sql, binds) = lower(&predicate);
        assert_eq!(
            where_sql,
            " WHERE construction.model ILIKE $1 AND car.tags LIKE $2 AND car.rating = $3"
        );
        assert_eq!(
            binds,
            vec![
                Scalar::Text("%kom%".to_string()),
                Scalar::Text("%MERCEDES%".to_string()),
                Scalar::Int(5),
            ]
        );
    }

    #[test]
    fn tags_round_trip_through_the_delimited_column() {
        let tags: BTreeSet<String> = ["AUDI".to_string(), "JAVASCRIPT".to_string()]
            .into_iter()
            .collect();
        assert_eq!(join_tags(&tags), "AUDI,JAVASCRIPT");
        assert_eq!(split_tags("AUDI,JAVASCRIPT"), tags);
        assert!(split_tags("").is_empty());
    }
}
