use anyhow::{Context, Result};
use moneta_client::ApiClient;
use moneta_core::{TransactionKind, aggregate_by_category, recent_trend};

use crate::account::require_session;
use crate::records::format_row;

/// Number of points in the recent-trend view, same as the line chart.
const TREND_LIMIT: usize = 6;

pub async fn show(client: &ApiClient) -> Result<()> {
    require_session(client).await?;

    let summary = client.dashboard().await.context("failed to load dashboard")?;

    println!("Balance:   {:>12.2}", summary.total_balance);
    println!("Incomes:   {:>12.2}", summary.total_incomes);
    println!("Expenses:  {:>12.2}", summary.total_expenses);

    if !summary.recent_transactions.is_empty() {
        println!("\nRecent transactions:");
        for t in summary.recent_transactions.iter().take(5) {
            println!("  {}", format_row(t));
        }
    }
    if !summary.recent_incomes.is_empty() {
        println!("\nRecent incomes:");
        for t in summary.recent_incomes.iter().take(5) {
            println!("  {}", format_row(t));
        }
    }
    if !summary.recent_expenses.is_empty() {
        println!("\nRecent expenses:");
        for t in summary.recent_expenses.iter().take(5) {
            println!("  {}", format_row(t));
        }
    }
    Ok(())
}

/// The chart data without the chart: per-category totals plus the last
/// few amounts in order.
pub async fn overview(client: &ApiClient, kind: TransactionKind) -> Result<()> {
    require_session(client).await?;

    let txns = client
        .transactions(kind)
        .await
        .with_context(|| format!("failed to fetch {}s", kind.as_str()))?;

    if txns.is_empty() {
        println!("No {} records yet.", kind.as_str());
        return Ok(());
    }

    let buckets = aggregate_by_category(&txns);
    let total: f64 = buckets.iter().map(|b| b.total_amount).sum();

    println!("{} breakdown by category:", kind.as_str());
    for bucket in &buckets {
        let share = if total != 0.0 {
            bucket.total_amount / total * 100.0
        } else {
            0.0
        };
        println!("  {:<20} {:>10.2}  {:>5.1}%", bucket.name, bucket.total_amount, share);
    }
    println!("  {:<20} {:>10.2}", "total", total);

    println!("\nRecent trend (last {}):", TREND_LIMIT);
    for point in recent_trend(&txns, TREND_LIMIT) {
        println!("  {:<3} {:>10.2}", point.label, point.amount);
    }
    Ok(())
}
