//! Typed request/response contracts for each endpoint.

use chrono::NaiveDate;
use moneta_core::{CategoryType, Profile, TransactionKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub profile: Profile,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    /// Already-hosted image URL; this client does not upload images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

/// Create/update body for a category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryPayload {
    #[serde(rename = "categoryName")]
    pub category_name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Body for `POST /filter`. Unset bounds and an empty keyword mean
/// "no restriction"; sorting is applied server-side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub keyword: String,
    pub sort_by: String,
    pub sort_order: String,
}

impl FilterRequest {
    /// Unrestricted filter for `kind`, sorted by date ascending.
    pub fn for_kind(kind: TransactionKind) -> Self {
        Self {
            kind,
            start_date: None,
            end_date: None,
            keyword: String::new(),
            sort_by: "date".to_string(),
            sort_order: "asc".to_string(),
        }
    }
}
