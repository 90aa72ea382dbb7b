// src/db/catalog_repo.rs
//
// Setores, marcas e modelos.

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{db_utils::unique_violation, error::AppError},
    models::catalog::{Brand, DeviceModel, Sector},
};

fn map_name_conflict(e: sqlx::Error, name: &str) -> AppError {
    match unique_violation(&e) {
        Some("sectors_name_key" | "brands_name_key" | "models_brand_name_key") => {
            AppError::CatalogNameAlreadyExists(name.to_string())
        }
        _ => e.into(),
    }
}

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- SETORES ---

    pub async fn create_sector<'e, E>(&self, executor: E, name: &str) -> Result<Sector, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Sector>("INSERT INTO sectors (name) VALUES ($1) RETURNING id, name")
            .bind(name.trim())
            .fetch_one(executor)
            .await
            .map_err(|e| map_name_conflict(e, name))
    }

    pub async fn rename_sector(&self, id: i64, name: &str) -> Result<Option<Sector>, AppError> {
        sqlx::query_as::<_, Sector>("UPDATE sectors SET name = $2 WHERE id = $1 RETURNING id, name")
            .bind(id)
            .bind(name.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_name_conflict(e, name))
    }

    pub async fn list_sectors(&self) -> Result<Vec<Sector>, AppError> {
        let sectors = sqlx::query_as::<_, Sector>("SELECT id, name FROM sectors ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(sectors)
    }

    pub async fn find_sector_by_name<'e, E>(&self, executor: E, name: &str) -> Result<Option<Sector>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sector = sqlx::query_as::<_, Sector>(
            "SELECT id, name FROM sectors WHERE lower(name) = lower($1)",
        )
        .bind(name.trim())
        .fetch_optional(executor)
        .await?;
        Ok(sector)
    }

    // --- MARCAS ---

    pub async fn create_brand<'e, E>(&self, executor: E, name: &str) -> Result<Brand, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Brand>("INSERT INTO brands (name) VALUES ($1) RETURNING id, name")
            .bind(name.trim())
            .fetch_one(executor)
            .await
            .map_err(|e| map_name_conflict(e, name))
    }

    pub async fn rename_brand(&self, id: i64, name: &str) -> Result<Option<Brand>, AppError> {
        sqlx::query_as::<_, Brand>("UPDATE brands SET name = $2 WHERE id = $1 RETURNING id, name")
            .bind(id)
            .bind(name.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_name_conflict(e, name))
    }

    pub async fn list_brands(&self) -> Result<Vec<Brand>, AppError> {
        let brands = sqlx::query_as::<_, Brand>("SELECT id, name FROM brands ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(brands)
    }

    pub async fn find_brand_by_name<'e, E>(&self, executor: E, name: &str) -> Result<Option<Brand>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let brand = sqlx::query_as::<_, Brand>(
            "SELECT id, name FROM brands WHERE lower(name) = lower($1)",
        )
        .bind(name.trim())
        .fetch_optional(executor)
        .await?;
        Ok(brand)
    }

    // --- MODELOS ---

    pub async fn create_model<'e, E>(&self, executor: E, brand_id: i64, name: &str) -> Result<DeviceModel, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, DeviceModel>(
            r#"
            WITH inserted AS (
                INSERT INTO models (brand_id, name) VALUES ($1, $2)
                RETURNING id, brand_id, name
            )
            SELECT i.id, i.brand_id, b.name AS brand_name, i.name
            FROM inserted i
            JOIN brands b ON b.id = i.brand_id
            "#,
        )
        .bind(brand_id)
        .bind(name.trim())
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::UnknownReference(format!("marca {}", brand_id));
                }
            }
            map_name_conflict(e, name)
        })
    }

    pub async fn rename_model(&self, id: i64, name: &str) -> Result<Option<DeviceModel>, AppError> {
        sqlx::query_as::<_, DeviceModel>(
            r#"
            WITH updated AS (
                UPDATE models SET name = $2 WHERE id = $1
                RETURNING id, brand_id, name
            )
            SELECT u.id, u.brand_id, b.name AS brand_name, u.name
            FROM updated u
            JOIN brands b ON b.id = u.brand_id
            "#,
        )
        .bind(id)
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_name_conflict(e, name))
    }

    pub async fn list_models(&self) -> Result<Vec<DeviceModel>, AppError> {
        let models = sqlx::query_as::<_, DeviceModel>(
            r#"
            SELECT m.id, m.brand_id, b.name AS brand_name, m.name
            FROM models m
            JOIN brands b ON b.id = m.brand_id
            ORDER BY b.name, m.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(models)
    }

    /// Resolve "Marca - Modelo" já separado em marca e modelo.
    pub async fn find_model<'e, E>(
        &self,
        executor: E,
        brand_name: &str,
        model_name: &str,
    ) -> Result<Option<DeviceModel>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let model = sqlx::query_as::<_, DeviceModel>(
            r#"
            SELECT m.id, m.brand_id, b.name AS brand_name, m.name
            FROM models m
            JOIN brands b ON b.id = m.brand_id
            WHERE lower(b.name) = lower($1) AND lower(m.name) = lower($2)
            "#,
        )
        .bind(brand_name.trim())
        .bind(model_name.trim())
        .fetch_optional(executor)
        .await?;
        Ok(model)
    }
}
