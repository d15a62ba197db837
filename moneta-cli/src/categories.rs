use anyhow::{Context, Result};
use moneta_client::{ApiClient, CategoryPayload};
use moneta_core::{CategoryType, TransactionKind, validate_category_name};

use crate::account::require_session;

fn category_type(kind: TransactionKind) -> CategoryType {
    match kind {
        TransactionKind::Income => CategoryType::Income,
        TransactionKind::Expense => CategoryType::Expense,
    }
}

pub async fn list(client: &ApiClient, kind: Option<TransactionKind>) -> Result<()> {
    require_session(client).await?;

    let categories = match kind {
        Some(kind) => client.categories_by_type(kind).await,
        None => client.categories().await,
    }
    .context("failed to fetch categories")?;

    if categories.is_empty() {
        println!("No categories yet. Add one with: moneta category add");
        return Ok(());
    }
    for c in &categories {
        println!(
            "[{}] {} {} ({:?})",
            c.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
            c.icon.as_deref().unwrap_or(" "),
            c.category_name,
            c.category_type
        );
    }
    Ok(())
}

pub async fn add(
    client: &ApiClient,
    name: String,
    kind: TransactionKind,
    icon: Option<String>,
) -> Result<()> {
    require_session(client).await?;
    validate_category_name(&name)?;

    let created = client
        .add_category(&CategoryPayload {
            category_name: name,
            category_type: category_type(kind),
            icon,
        })
        .await
        .context("failed to save category")?;
    println!(
        "Added category {} ({:?})",
        created.category_name, created.category_type
    );
    Ok(())
}

pub async fn update(
    client: &ApiClient,
    id: i64,
    name: String,
    kind: TransactionKind,
    icon: Option<String>,
) -> Result<()> {
    require_session(client).await?;
    validate_category_name(&name)?;

    let updated = client
        .update_category(
            id,
            &CategoryPayload {
                category_name: name,
                category_type: category_type(kind),
                icon,
            },
        )
        .await
        .context("failed to update category")?;
    println!("Updated category {}", updated.category_name);
    Ok(())
}

pub async fn delete(client: &ApiClient, id: i64) -> Result<()> {
    require_session(client).await?;

    client
        .delete_category(id)
        .await
        .context("failed to delete category")?;
    println!("Deleted category {id}");
    Ok(())
}
