// src/models/catalog.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceModel {
    pub id: i64,
    pub brand_id: i64,
    pub brand_name: String,
    pub name: String,
}

impl DeviceModel {
    /// Forma usada nas planilhas: "Marca - Modelo".
    pub fn full_name(&self) -> String {
        format!("{} - {}", self.brand_name, self.name)
    }
}

/// Separa "Marca - Modelo" no primeiro " - ".
pub fn split_full_model_name(full: &str) -> Option<(&str, &str)> {
    let (brand, model) = full.split_once(" - ")?;
    let (brand, model) = (brand.trim(), model.trim());
    if brand.is_empty() || model.is_empty() {
        return None;
    }
    Some((brand, model))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogNamePayload {
    #[validate(length(min = 1, max = 120, message = "O nome é obrigatório."))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateModelPayload {
    pub brand_id: i64,
    #[validate(length(min = 1, max = 120, message = "O nome é obrigatório."))]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_brand_and_model() {
        assert_eq!(split_full_model_name("Samsung - Galaxy A54"), Some(("Samsung", "Galaxy A54")));
        assert_eq!(split_full_model_name("Moto - G - 5G"), Some(("Moto", "G - 5G")));
        assert_eq!(split_full_model_name("Galaxy A54"), None);
        assert_eq!(split_full_model_name(" - A54"), None);
    }
}
