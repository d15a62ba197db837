use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use moneta_client::ApiClient;
use moneta_core::{Transaction, TransactionKind, TransactionPayload, validate_transaction};

use crate::account::require_session;

/// List records together with the matching category set.
///
/// Both fetches run concurrently; if either fails the whole listing fails
/// and nothing partial is shown.
pub async fn list(client: &ApiClient, kind: TransactionKind) -> Result<()> {
    require_session(client).await?;

    let (txns, categories) = tokio::try_join!(
        client.transactions(kind),
        client.categories_by_type(kind)
    )
    .with_context(|| format!("failed to fetch {}s and categories", kind.as_str()))?;

    if txns.is_empty() {
        println!("No {} records yet.", kind.as_str());
    } else {
        for t in &txns {
            println!("{}", format_row(t));
        }
        let total: f64 = txns.iter().map(|t| t.amount).sum();
        println!("\n{} records, total {:.2}", txns.len(), total);
    }

    println!(
        "{} categories available (see: moneta category list {})",
        categories.len(),
        kind.as_str()
    );
    Ok(())
}

pub async fn add(
    client: &ApiClient,
    kind: TransactionKind,
    name: String,
    amount: f64,
    date: Option<NaiveDate>,
    category: i64,
    icon: Option<String>,
) -> Result<()> {
    require_session(client).await?;

    let payload = TransactionPayload {
        name,
        amount,
        date: date.unwrap_or_else(|| Local::now().date_naive()),
        category_id: category,
        icon,
    };
    validate_transaction(&payload)?;

    let created = client
        .add_transaction(kind, &payload)
        .await
        .with_context(|| format!("failed to save {}", kind.as_str()))?;
    println!("Added: {}", format_row(&created));
    Ok(())
}

pub async fn update(
    client: &ApiClient,
    kind: TransactionKind,
    id: i64,
    name: String,
    amount: f64,
    date: Option<NaiveDate>,
    category: i64,
    icon: Option<String>,
) -> Result<()> {
    require_session(client).await?;

    let payload = TransactionPayload {
        name,
        amount,
        date: date.unwrap_or_else(|| Local::now().date_naive()),
        category_id: category,
        icon,
    };
    validate_transaction(&payload)?;

    let updated = client
        .update_transaction(kind, id, &payload)
        .await
        .with_context(|| format!("failed to update {} {id}", kind.as_str()))?;
    println!("Updated: {}", format_row(&updated));
    Ok(())
}

pub async fn delete(client: &ApiClient, kind: TransactionKind, id: i64) -> Result<()> {
    require_session(client).await?;

    client
        .delete_transaction(kind, id)
        .await
        .with_context(|| format!("failed to delete {} {id}", kind.as_str()))?;
    println!("Deleted {} {id}", kind.as_str());
    Ok(())
}

pub fn format_row(t: &Transaction) -> String {
    format!(
        "[{}] {} {} {} | {} | {:>10.2}",
        t.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
        t.date,
        t.icon.as_deref().unwrap_or(" "),
        t.name,
        t.category_name,
        t.amount
    )
}
