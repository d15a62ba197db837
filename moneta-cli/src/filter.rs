use anyhow::{Context, Result};
use moneta_client::{ApiClient, FilterRequest};

use crate::account::require_session;
use crate::records::format_row;

pub async fn run(client: &ApiClient, request: FilterRequest) -> Result<()> {
    require_session(client).await?;

    let txns = client
        .filter(&request)
        .await
        .context("failed to fetch transactions")?;

    if txns.is_empty() {
        println!("No matching transactions.");
        return Ok(());
    }
    for t in &txns {
        println!("{}", format_row(t));
    }
    println!("\n{} matching transactions", txns.len());
    Ok(())
}
