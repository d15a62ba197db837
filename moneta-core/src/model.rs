//! Wire types for the Money Manager REST API.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Whether a record or operation concerns money coming in or going out.
///
/// Used in URL segments (`/categories/income`, `/excel/download/expense`)
/// and in the filter request body, so it serializes lowercase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// URL path segment for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

/// Category type as the API stores it (uppercase on the wire).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CategoryType {
    #[serde(rename = "INCOME")]
    Income,
    #[serde(rename = "EXPENSE")]
    Expense,
}

/// A single income or expense record as returned by the API.
///
/// Records are immutable once fetched; changes go through explicit
/// update/delete calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    /// Summed by the aggregator; coerced leniently, see [`amount_or_zero`].
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub category_id: Option<i64>,
    /// Denormalized category display name. Aggregation buckets by this,
    /// not by `category_id`.
    #[serde(default)]
    pub category_name: String,
}

/// Body for creating or updating a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    pub name: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A user-defined transaction category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "categoryName", default)]
    pub category_name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Profile info returned by login and `GET /profile`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// Aggregate figures and recent activity from `GET /dashboard`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DashboardSummary {
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub total_balance: f64,
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub total_incomes: f64,
    #[serde(default, deserialize_with = "amount_or_zero")]
    pub total_expenses: f64,
    #[serde(rename = "RecentTransactions", default)]
    pub recent_transactions: Vec<Transaction>,
    #[serde(rename = "Recent5incomes", default)]
    pub recent_incomes: Vec<Transaction>,
    #[serde(rename = "Recent5expenses", default)]
    pub recent_expenses: Vec<Transaction>,
}

/// Lenient amount deserializer: accepts a JSON number, a numeric string,
/// or null; anything unparseable becomes 0.0 so a bad record can never
/// poison a whole list response.
fn amount_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Num(n)) => n,
        Some(Raw::Text(s)) => s.trim().parse().unwrap_or(0.0),
        None => 0.0,
    })
}
