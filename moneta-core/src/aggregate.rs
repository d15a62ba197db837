//! Chart-ready aggregation over fetched transaction lists.
//!
//! Pure and synchronous: these functions never touch the network and never
//! fail, whatever the input slice looks like. Empty in, empty out.

use crate::model::Transaction;

/// Summed amount for one category bucket in the breakdown (pie) view.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub name: String,
    pub total_amount: f64,
}

/// One point of the recent-activity (line) view.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub label: String,
    pub amount: f64,
}

/// Group transactions by category display name and sum their amounts.
///
/// Buckets come out in first-occurrence order of each name, so output is
/// reproducible for a given input order. Grouping is by name, not id: two
/// categories sharing a display name merge into one bucket.
pub fn aggregate_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for txn in transactions {
        match totals.iter_mut().find(|t| t.name == txn.category_name) {
            Some(bucket) => bucket.total_amount += txn.amount,
            None => totals.push(CategoryTotal {
                name: txn.category_name.clone(),
                total_amount: txn.amount,
            }),
        }
    }

    totals
}

/// Take the last `limit` transactions in the order given (no date sort)
/// and label them `#1..#n` across that slice.
pub fn recent_trend(transactions: &[Transaction], limit: usize) -> Vec<TrendPoint> {
    let start = transactions.len().saturating_sub(limit);

    transactions[start..]
        .iter()
        .enumerate()
        .map(|(i, txn)| TrendPoint {
            label: format!("#{}", i + 1),
            amount: txn.amount,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(category: &str, amount: f64) -> Transaction {
        Transaction {
            id: None,
            name: String::new(),
            icon: None,
            amount,
            date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            category_id: None,
            category_name: category.to_string(),
        }
    }

    #[test]
    fn test_aggregate_groups_in_first_occurrence_order() {
        let txns = vec![txn("Food", 100.0), txn("Food", 50.0), txn("Rent", 900.0)];
        let totals = aggregate_by_category(&txns);

        assert_eq!(
            totals,
            vec![
                CategoryTotal {
                    name: "Food".to_string(),
                    total_amount: 150.0
                },
                CategoryTotal {
                    name: "Rent".to_string(),
                    total_amount: 900.0
                },
            ]
        );
    }

    #[test]
    fn test_aggregate_preserves_grand_total_and_bucket_count() {
        let txns = vec![
            txn("Food", 12.5),
            txn("Travel", 80.0),
            txn("Food", 7.5),
            txn("Rent", 900.0),
            txn("Travel", 20.0),
        ];
        let totals = aggregate_by_category(&txns);

        let input_sum: f64 = txns.iter().map(|t| t.amount).sum();
        let bucket_sum: f64 = totals.iter().map(|t| t.total_amount).sum();
        assert!((input_sum - bucket_sum).abs() < 1e-9);
        assert_eq!(totals.len(), 3);
    }

    #[test]
    fn test_aggregate_empty_input() {
        assert!(aggregate_by_category(&[]).is_empty());
    }

    #[test]
    fn test_same_name_different_categories_merge() {
        // Name-keyed grouping: ids play no part.
        let mut a = txn("Misc", 10.0);
        a.category_id = Some(1);
        let mut b = txn("Misc", 30.0);
        b.category_id = Some(2);

        let totals = aggregate_by_category(&[a, b]);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total_amount, 40.0);
    }

    #[test]
    fn test_trend_short_input_is_identity_with_labels() {
        let txns = vec![txn("a", 1.0), txn("b", 2.0), txn("c", 3.0)];
        let points = recent_trend(&txns, 6);

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].label, "#1");
        assert_eq!(points[2].label, "#3");
        assert_eq!(points[2].amount, 3.0);
    }

    #[test]
    fn test_trend_takes_last_n_in_given_order() {
        let txns: Vec<Transaction> = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0]
            .iter()
            .map(|&a| txn("x", a))
            .collect();
        let points = recent_trend(&txns, 6);

        assert_eq!(points.len(), 6);
        assert_eq!(points[0].label, "#1");
        assert_eq!(points[0].amount, 30.0);
        assert_eq!(points[5].label, "#6");
        assert_eq!(points[5].amount, 80.0);
    }

    #[test]
    fn test_trend_empty_input() {
        assert!(recent_trend(&[], 6).is_empty());
    }
}
