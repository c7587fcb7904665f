//! Pure aggregation over ledger rows: per-account balances as of a cutoff
//! date and per-category totals, plus stable orderings for display.
//!
//! Balances are derived, never stored. Every query re-derives them from the
//! full row set, so the results are independent of insertion order and
//! always consistent with the ledger.

use std::collections::HashMap;

use time::Date;

use crate::transaction::{Transaction, TransactionKind};

/// Per-account balances as of the end of `as_of` (inclusive).
///
/// Every account in `known_accounts` appears in the result, zero-filled if
/// it has no rows. Accounts that appear in rows but not in
/// `known_accounts` (renamed or retired ones) are still aggregated.
pub fn balances_as_of(
    transactions: &[Transaction],
    as_of: Date,
    known_accounts: &[String],
) -> HashMap<String, i64> {
    let mut balances: HashMap<String, i64> = known_accounts
        .iter()
        .map(|account| (account.clone(), 0))
        .collect();

    for transaction in transactions {
        if transaction.date > as_of {
            continue;
        }

        *balances.entry(transaction.account.clone()).or_insert(0) +=
            transaction.signed_amount();
    }

    balances
}

/// Sum of all account balances, i.e. the total money held.
///
/// Transfers cancel out between their two legs, so only external inflows
/// and outflows (fees included) move this number.
pub fn total_balance(balances: &HashMap<String, i64>) -> i64 {
    balances.values().sum()
}

/// Per-category totals for rows of the given kind, skipping the categories
/// in `excluded` (typically "Top Up", which is money movement rather than
/// income or spending).
pub fn category_totals(
    transactions: &[Transaction],
    kind: TransactionKind,
    excluded: &[&str],
) -> HashMap<String, i64> {
    let mut totals: HashMap<String, i64> = HashMap::new();

    for transaction in transactions {
        if transaction.kind != kind {
            continue;
        }
        if excluded.contains(&transaction.category.as_str()) {
            continue;
        }

        *totals.entry(transaction.category.clone()).or_insert(0) += transaction.amount;
    }

    totals
}

/// Order balances by amount descending, ties by account name ascending.
pub fn sorted_balances(balances: &HashMap<String, i64>) -> Vec<(String, i64)> {
    let mut entries: Vec<(String, i64)> = balances
        .iter()
        .map(|(account, balance)| (account.clone(), *balance))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    entries
}

/// Order category totals by amount descending, ties by category ascending.
pub fn sorted_category_totals(totals: &HashMap<String, i64>) -> Vec<(String, i64)> {
    let mut entries: Vec<(String, i64)> = totals
        .iter()
        .map(|(category, total)| (category.clone(), *total))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    entries
}


#[cfg(test)]
mod category_tests {
    use std::collections::HashMap;

    use time::macros::date;

    use crate::transaction::{CATEGORY_TOP_UP, Transaction, TransactionKind};

    use super::{category_totals, sorted_balances, sorted_category_totals};

    fn expense(id: i64, category: &str, amount: i64) -> Transaction {
        Transaction {
            id,
            date: date!(2025 - 06 - 01),
            kind: TransactionKind::Outflow,
            category: category.to_owned(),
            account: "BCA".to_owned(),
            amount,
            description: String::new(),
            transfer_group_id: None,
        }
    }

    #[test]
    fn sums_per_category_for_the_requested_kind() {
        let mut rows = vec![expense(1, "Makan", 100), expense(2, "Makan", 200)];
        rows.push(Transaction {
            kind: TransactionKind::Inflow,
            category: "Gaji".to_owned(),
            ..expense(3, "Gaji", 5_000)
        });

        let totals = category_totals(&rows, TransactionKind::Outflow, &[]);

        assert_eq!(totals, HashMap::from([("Makan".to_owned(), 300)]));
    }

    #[test]
    fn excluded_categories_are_skipped() {
        let rows = vec![
            expense(1, "Makan", 300),
            expense(2, CATEGORY_TOP_UP, 50_000),
        ];

        let totals = category_totals(&rows, TransactionKind::Outflow, &[CATEGORY_TOP_UP]);

        assert_eq!(totals, HashMap::from([("Makan".to_owned(), 300)]));
    }

    #[test]
    fn totals_sort_descending_with_label_tie_break() {
        let totals = HashMap::from([
            ("Makan".to_owned(), 300),
            ("Internet".to_owned(), 300),
            ("Transportasi".to_owned(), 900),
        ]);

        let got = sorted_category_totals(&totals);

        let want = vec![
            ("Transportasi".to_owned(), 900),
            ("Internet".to_owned(), 300),
            ("Makan".to_owned(), 300),
        ];
        assert_eq!(got, want);
    }

    #[test]
    fn balances_sort_descending_with_name_tie_break() {
        let balances = HashMap::from([
            ("GoPay".to_owned(), 100),
            ("BCA".to_owned(), 100),
            ("Jago".to_owned(), 2_000),
        ]);

        let got = sorted_balances(&balances);

        let want = vec![
            ("Jago".to_owned(), 2_000),
            ("BCA".to_owned(), 100),
            ("GoPay".to_owned(), 100),
        ];
        assert_eq!(got, want);
    }
}
