//! Turns a single user-facing "record a transaction" intent into the exact
//! set of ledger row drafts to persist.
//!
//! Composition is a pure function: every validation runs before any I/O is
//! possible, and a failure therefore guarantees zero side effects. A simple
//! intent drafts one row; a transfer drafts an outflow and an inflow leg
//! carrying the same principal, plus a separate fee leg when an admin fee
//! was charged. The fee is never folded into the principal legs so that
//! "Top Up" and "Biaya Admin" totals stay accurate.

use time::Date;
use uuid::Uuid;

use crate::{
    config::LedgerConfig,
    error::ValidationError,
    transaction::{CATEGORY_ADMIN_FEE, CATEGORY_TOP_UP, TransactionDraft, TransactionKind},
};

/// Which account pays a transfer's admin fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeeCharge {
    /// The fee is charged to the source account.
    #[default]
    Source,
    /// The fee is deducted from the destination account.
    Destination,
}

/// What the user asked to record, before it becomes ledger rows.
///
/// Amounts are typed integers in minor currency units; run user input
/// through [parse_amount](crate::parse_amount) first.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionIntent {
    /// A plain income or expense: produces exactly one row.
    Simple {
        /// The calendar date of the transaction.
        date: Date,
        /// Inflow or outflow.
        kind: TransactionKind,
        /// A category from the configured set for `kind`.
        category: String,
        /// The account the money moves into or out of.
        account: String,
        /// The amount in minor currency units; must be positive.
        amount: i64,
        /// Free-form description, may be empty.
        description: String,
    },
    /// Moving money between two own accounts: produces two rows, or three
    /// when an admin fee was charged.
    Transfer {
        /// The calendar date of the transfer.
        date: Date,
        /// The account the money leaves.
        from_account: String,
        /// The account the money arrives in.
        to_account: String,
        /// The principal in minor currency units; must be positive. Both
        /// legs carry this amount in full.
        amount: i64,
        /// Free-form description applied to both legs; when empty, each leg
        /// gets a default naming the opposite account.
        description: String,
        /// The admin fee in minor currency units; 0 means no fee.
        fee: i64,
        /// Which account pays the fee.
        fee_charge: FeeCharge,
    },
}

/// Translate an intent into the drafts to persist, as an all-or-nothing
/// batch.
///
/// The returned drafts are internally consistent but not yet persisted;
/// hand them to [persist_drafts](crate::persist_drafts) (or the SQLite
/// store's atomic `insert_all`) as one unit.
///
/// # Errors
/// Returns a [ValidationError] naming the offending field; nothing is
/// returned for persistence on failure.
pub fn compose(
    intent: TransactionIntent,
    config: &LedgerConfig,
) -> Result<Vec<TransactionDraft>, ValidationError> {
    match intent {
        TransactionIntent::Simple {
            date,
            kind,
            category,
            account,
            amount,
            description,
        } => {
            if amount <= 0 {
                return Err(ValidationError::NonPositiveAmount);
            }
            if !config.has_category(kind, &category) {
                return Err(ValidationError::UnknownCategory { category, kind });
            }
            if !config.is_known_account(&account) {
                return Err(ValidationError::UnknownAccount(account));
            }

            Ok(vec![TransactionDraft {
                date,
                kind,
                category,
                account,
                amount,
                description,
                transfer_group_id: None,
            }])
        }
        TransactionIntent::Transfer {
            date,
            from_account,
            to_account,
            amount,
            description,
            fee,
            fee_charge,
        } => {
            if amount <= 0 {
                return Err(ValidationError::NonPositiveAmount);
            }
            if from_account == to_account {
                return Err(ValidationError::SameAccountTransfer(from_account));
            }
            if fee < 0 {
                return Err(ValidationError::NegativeFee);
            }
            if !config.is_known_account(&from_account) {
                return Err(ValidationError::UnknownAccount(from_account));
            }
            if !config.is_known_account(&to_account) {
                return Err(ValidationError::UnknownAccount(to_account));
            }

            let group = Uuid::new_v4();
            let description = description.trim().to_owned();
            let (outflow_description, inflow_description) = if description.is_empty() {
                (
                    format!("Top Up ke {to_account}"),
                    format!("Top Up dari {from_account}"),
                )
            } else {
                (description.clone(), description)
            };
            let fee_description = format!("Biaya admin Top Up dari {from_account} ke {to_account}");

            let mut drafts = vec![
                TransactionDraft {
                    date,
                    kind: TransactionKind::Outflow,
                    category: CATEGORY_TOP_UP.to_owned(),
                    account: from_account.clone(),
                    amount,
                    description: outflow_description,
                    transfer_group_id: Some(group),
                },
                TransactionDraft {
                    date,
                    kind: TransactionKind::Inflow,
                    category: CATEGORY_TOP_UP.to_owned(),
                    account: to_account.clone(),
                    amount,
                    description: inflow_description,
                    transfer_group_id: Some(group),
                },
            ];

            if fee > 0 {
                let fee_account = match fee_charge {
                    FeeCharge::Source => from_account,
                    FeeCharge::Destination => to_account,
                };

                drafts.push(TransactionDraft {
                    date,
                    kind: TransactionKind::Outflow,
                    category: CATEGORY_ADMIN_FEE.to_owned(),
                    account: fee_account,
                    amount: fee,
                    description: fee_description,
                    transfer_group_id: Some(group),
                });
            }

            Ok(drafts)
        }
    }
}

/// Check a draft against the configured account and category sets.
///
/// [compose] validates intents before drafting; this covers the other way
/// drafts come to exist, whole-row edits of a stored row, so an edit
/// cannot smuggle in values the forms would never offer.
///
/// # Errors
/// Returns a [ValidationError] naming the offending field.
pub fn validate_draft(
    draft: &TransactionDraft,
    config: &LedgerConfig,
) -> Result<(), ValidationError> {
    if draft.amount <= 0 {
        return Err(ValidationError::NonPositiveAmount);
    }
    if !config.has_category(draft.kind, &draft.category) {
        return Err(ValidationError::UnknownCategory {
            category: draft.category.clone(),
            kind: draft.kind,
        });
    }
    if !config.is_known_account(&draft.account) {
        return Err(ValidationError::UnknownAccount(draft.account.clone()));
    }

    Ok(())
}

#[cfg(test)]
mod compose_simple_tests {
    use time::macros::date;

    use crate::{
        config::LedgerConfig,
        error::ValidationError,
        transaction::TransactionKind,
    };

    use super::{TransactionIntent, compose};

    fn simple_intent(amount: i64) -> TransactionIntent {
        TransactionIntent::Simple {
            date: date!(2025 - 06 - 15),
            kind: TransactionKind::Outflow,
            category: "Internet".to_owned(),
            account: "BCA".to_owned(),
            amount,
            description: "wifi bulanan".to_owned(),
        }
    }

    #[test]
    fn drafts_exactly_one_row() {
        let drafts = compose(simple_intent(350_000), &LedgerConfig::default()).unwrap();

        assert_eq!(drafts.len(), 1);
        let draft = &drafts[0];
        assert_eq!(draft.amount, 350_000);
        assert_eq!(draft.kind, TransactionKind::Outflow);
        assert_eq!(draft.category, "Internet");
        assert_eq!(draft.account, "BCA");
        assert_eq!(draft.description, "wifi bulanan");
        assert_eq!(draft.transfer_group_id, None);
    }

    #[test]
    fn rejects_zero_amount() {
        assert_eq!(
            compose(simple_intent(0), &LedgerConfig::default()),
            Err(ValidationError::NonPositiveAmount)
        );
    }

    #[test]
    fn rejects_negative_amount() {
        assert_eq!(
            compose(simple_intent(-500), &LedgerConfig::default()),
            Err(ValidationError::NonPositiveAmount)
        );
    }

    #[test]
    fn rejects_category_from_wrong_kind() {
        // "Gaji" is an income category, the intent is an outflow.
        let intent = TransactionIntent::Simple {
            date: date!(2025 - 06 - 15),
            kind: TransactionKind::Outflow,
            category: "Gaji".to_owned(),
            account: "BCA".to_owned(),
            amount: 1_000,
            description: String::new(),
        };

        assert_eq!(
            compose(intent, &LedgerConfig::default()),
            Err(ValidationError::UnknownCategory {
                category: "Gaji".to_owned(),
                kind: TransactionKind::Outflow
            })
        );
    }

    #[test]
    fn rejects_unknown_account() {
        let intent = TransactionIntent::Simple {
            date: date!(2025 - 06 - 15),
            kind: TransactionKind::Inflow,
            category: "Gaji".to_owned(),
            account: "Paypal".to_owned(),
            amount: 1_000,
            description: String::new(),
        };

        assert_eq!(
            compose(intent, &LedgerConfig::default()),
            Err(ValidationError::UnknownAccount("Paypal".to_owned()))
        );
    }
}

#[cfg(test)]
mod compose_transfer_tests {
    use time::macros::date;

    use crate::{
        config::LedgerConfig,
        error::ValidationError,
        transaction::{CATEGORY_ADMIN_FEE, CATEGORY_TOP_UP, TransactionKind},
    };

    use super::{FeeCharge, TransactionIntent, compose};

    fn transfer_intent(amount: i64, fee: i64, fee_charge: FeeCharge) -> TransactionIntent {
        TransactionIntent::Transfer {
            date: date!(2025 - 06 - 15),
            from_account: "BCA".to_owned(),
            to_account: "GoPay".to_owned(),
            amount,
            description: String::new(),
            fee,
            fee_charge,
        }
    }

    #[test]
    fn no_fee_drafts_two_mirrored_legs() {
        let drafts =
            compose(transfer_intent(50_000, 0, FeeCharge::Source), &LedgerConfig::default())
                .unwrap();

        assert_eq!(drafts.len(), 2);

        let outflow = &drafts[0];
        assert_eq!(outflow.kind, TransactionKind::Outflow);
        assert_eq!(outflow.account, "BCA");
        assert_eq!(outflow.amount, 50_000);
        assert_eq!(outflow.category, CATEGORY_TOP_UP);

        let inflow = &drafts[1];
        assert_eq!(inflow.kind, TransactionKind::Inflow);
        assert_eq!(inflow.account, "GoPay");
        assert_eq!(inflow.amount, 50_000);
        assert_eq!(inflow.category, CATEGORY_TOP_UP);
    }

    #[test]
    fn legs_share_a_group_id_and_fresh_composes_differ() {
        let config = LedgerConfig::default();

        let first = compose(transfer_intent(50_000, 0, FeeCharge::Source), &config).unwrap();
        let second = compose(transfer_intent(50_000, 0, FeeCharge::Source), &config).unwrap();

        let group = first[0].transfer_group_id.expect("legs must carry a group id");
        assert!(first.iter().all(|draft| draft.transfer_group_id == Some(group)));
        assert_ne!(second[0].transfer_group_id, Some(group));
    }

    #[test]
    fn empty_description_defaults_per_leg() {
        let drafts =
            compose(transfer_intent(50_000, 0, FeeCharge::Source), &LedgerConfig::default())
                .unwrap();

        assert_eq!(drafts[0].description, "Top Up ke GoPay");
        assert_eq!(drafts[1].description, "Top Up dari BCA");
    }

    #[test]
    fn user_description_is_mirrored_on_both_legs() {
        let intent = TransactionIntent::Transfer {
            date: date!(2025 - 06 - 15),
            from_account: "BCA".to_owned(),
            to_account: "GoPay".to_owned(),
            amount: 50_000,
            description: "isi saldo ojek".to_owned(),
            fee: 0,
            fee_charge: FeeCharge::Source,
        };

        let drafts = compose(intent, &LedgerConfig::default()).unwrap();

        assert_eq!(drafts[0].description, "isi saldo ojek");
        assert_eq!(drafts[1].description, "isi saldo ojek");
    }

    #[test]
    fn fee_drafts_a_third_row_on_the_source_account() {
        let drafts =
            compose(transfer_intent(50_000, 2_500, FeeCharge::Source), &LedgerConfig::default())
                .unwrap();

        assert_eq!(drafts.len(), 3);

        let fee = &drafts[2];
        assert_eq!(fee.kind, TransactionKind::Outflow);
        assert_eq!(fee.account, "BCA");
        assert_eq!(fee.amount, 2_500);
        assert_eq!(fee.category, CATEGORY_ADMIN_FEE);
        assert_eq!(fee.description, "Biaya admin Top Up dari BCA ke GoPay");
        assert_eq!(fee.transfer_group_id, drafts[0].transfer_group_id);
    }

    #[test]
    fn fee_can_be_charged_to_the_destination() {
        let drafts = compose(
            transfer_intent(50_000, 2_500, FeeCharge::Destination),
            &LedgerConfig::default(),
        )
        .unwrap();

        assert_eq!(drafts[2].account, "GoPay");
    }

    #[test]
    fn fee_is_never_merged_into_the_principal() {
        let drafts =
            compose(transfer_intent(50_000, 2_500, FeeCharge::Source), &LedgerConfig::default())
                .unwrap();

        assert!(drafts.iter().all(|draft| draft.amount != 52_500));
        assert_eq!(drafts[0].amount, 50_000);
        assert_eq!(drafts[1].amount, 50_000);
    }

    #[test]
    fn zero_fee_never_drafts_a_fee_row() {
        let drafts =
            compose(transfer_intent(50_000, 0, FeeCharge::Source), &LedgerConfig::default())
                .unwrap();

        assert!(drafts.iter().all(|draft| draft.category != CATEGORY_ADMIN_FEE));
        assert!(drafts.iter().all(|draft| draft.amount > 0));
    }

    #[test]
    fn same_account_always_fails() {
        for amount in [1, 50_000, 1_000_000_000] {
            let intent = TransactionIntent::Transfer {
                date: date!(2025 - 06 - 15),
                from_account: "Jago".to_owned(),
                to_account: "Jago".to_owned(),
                amount,
                description: String::new(),
                fee: 0,
                fee_charge: FeeCharge::Source,
            };

            assert_eq!(
                compose(intent, &LedgerConfig::default()),
                Err(ValidationError::SameAccountTransfer("Jago".to_owned()))
            );
        }
    }

    #[test]
    fn rejects_non_positive_principal() {
        assert_eq!(
            compose(transfer_intent(0, 0, FeeCharge::Source), &LedgerConfig::default()),
            Err(ValidationError::NonPositiveAmount)
        );
    }

    #[test]
    fn rejects_negative_fee() {
        assert_eq!(
            compose(transfer_intent(50_000, -100, FeeCharge::Source), &LedgerConfig::default()),
            Err(ValidationError::NegativeFee)
        );
    }

    #[test]
    fn rejects_unknown_accounts_on_either_leg() {
        let config = LedgerConfig::default();

        let from_unknown = TransactionIntent::Transfer {
            date: date!(2025 - 06 - 15),
            from_account: "Paypal".to_owned(),
            to_account: "BCA".to_owned(),
            amount: 1_000,
            description: String::new(),
            fee: 0,
            fee_charge: FeeCharge::Source,
        };
        assert_eq!(
            compose(from_unknown, &config),
            Err(ValidationError::UnknownAccount("Paypal".to_owned()))
        );

        let to_unknown = TransactionIntent::Transfer {
            date: date!(2025 - 06 - 15),
            from_account: "BCA".to_owned(),
            to_account: "Paypal".to_owned(),
            amount: 1_000,
            description: String::new(),
            fee: 0,
            fee_charge: FeeCharge::Source,
        };
        assert_eq!(
            compose(to_unknown, &config),
            Err(ValidationError::UnknownAccount("Paypal".to_owned()))
        );
    }
}
