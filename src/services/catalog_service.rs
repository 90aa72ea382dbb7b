// src/services/catalog_service.rs

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::catalog::{Brand, DeviceModel, Sector},
};

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
    pool: sqlx::PgPool,
}

impl CatalogService {
    pub fn new(catalog_repo: CatalogRepository, pool: sqlx::PgPool) -> Self {
        Self { catalog_repo, pool }
    }

    // --- SETORES ---
    pub async fn create_sector(&self, name: &str) -> Result<Sector, AppError> {
        self.catalog_repo.create_sector(&self.pool, name).await
    }

    pub async fn rename_sector(&self, id: i64, name: &str) -> Result<Sector, AppError> {
        self.catalog_repo
            .rename_sector(id, name)
            .await?
            .ok_or_else(|| AppError::UnknownReference(format!("setor {}", id)))
    }

    pub async fn list_sectors(&self) -> Result<Vec<Sector>, AppError> {
        self.catalog_repo.list_sectors().await
    }

    // --- MARCAS ---
    pub async fn create_brand(&self, name: &str) -> Result<Brand, AppError> {
        self.catalog_repo.create_brand(&self.pool, name).await
    }

    pub async fn rename_brand(&self, id: i64, name: &str) -> Result<Brand, AppError> {
        self.catalog_repo
            .rename_brand(id, name)
            .await?
            .ok_or_else(|| AppError::UnknownReference(format!("marca {}", id)))
    }

    pub async fn list_brands(&self) -> Result<Vec<Brand>, AppError> {
        self.catalog_repo.list_brands().await
    }

    // --- MODELOS ---
    pub async fn create_model(&self, brand_id: i64, name: &str) -> Result<DeviceModel, AppError> {
        self.catalog_repo.create_model(&self.pool, brand_id, name).await
    }

    pub async fn rename_model(&self, id: i64, name: &str) -> Result<DeviceModel, AppError> {
        self.catalog_repo
            .rename_model(id, name)
            .await?
            .ok_or_else(|| AppError::UnknownReference(format!("modelo {}", id)))
    }

    pub async fn list_models(&self) -> Result<Vec<DeviceModel>, AppError> {
        self.catalog_repo.list_models().await
    }
}
