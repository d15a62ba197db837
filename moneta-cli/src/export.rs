use anyhow::{Context, Result};
use moneta_client::ApiClient;
use moneta_core::TransactionKind;
use std::path::Path;

use crate::account::require_session;

pub async fn download(client: &ApiClient, kind: TransactionKind, out: &Path) -> Result<()> {
    require_session(client).await?;

    let mut file =
        std::fs::File::create(out).with_context(|| format!("create {}", out.display()))?;
    let bytes = client
        .download_excel(kind, &mut file)
        .await
        .with_context(|| format!("failed to download {} spreadsheet", kind.as_str()))?;

    println!("Wrote {} bytes to {}", bytes, out.display());
    Ok(())
}

pub async fn email(client: &ApiClient, kind: TransactionKind) -> Result<()> {
    require_session(client).await?;

    client
        .email_excel(kind)
        .await
        .with_context(|| format!("failed to request {} spreadsheet email", kind.as_str()))?;

    println!("The {} spreadsheet will be emailed to your account address.", kind.as_str());
    Ok(())
}
