//! The closed sets of accounts and categories a ledger accepts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    transaction::{CATEGORY_ADMIN_FEE, CATEGORY_TOP_UP, TransactionKind},
};

/// The accounts and per-kind category sets the composer validates against.
///
/// This is an explicit value passed into [compose](crate::compose) rather
/// than ambient state: the category list a form offers depends on the
/// selected kind, and the engine must see the same sets the form used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// The accounts money can be recorded against.
    pub accounts: Vec<String>,
    /// Categories selectable for inflow rows.
    pub income_categories: Vec<String>,
    /// Categories selectable for outflow rows.
    pub expense_categories: Vec<String>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        let owned = |labels: &[&str]| labels.iter().map(|label| (*label).to_owned()).collect();

        // Lists are kept sorted; "Reimbursement" and "Top Up" deliberately
        // appear in both category sets.
        Self {
            accounts: owned(&["BCA", "Cash", "GoPay", "Jago", "ShopeePay", "e-Money"]),
            income_categories: owned(&[
                "Gaji",
                "Hadiah",
                "Hibah",
                "Lainnya",
                "Reimbursement",
                CATEGORY_TOP_UP,
            ]),
            expense_categories: owned(&[
                CATEGORY_ADMIN_FEE,
                "Entertainment",
                "Food & Grocery",
                "Hobi/Keinginan",
                "Internet",
                "Investasi",
                "Lain-lain",
                "Pengembangan Diri",
                "Primary Needs",
                "Reimbursement",
                "Skin-Hair-Body Care",
                "Tak Terduga",
                CATEGORY_TOP_UP,
                "Transportasi",
            ]),
        }
    }
}

impl LedgerConfig {
    /// The category set offered for rows of `kind`.
    pub fn categories_for(&self, kind: TransactionKind) -> &[String] {
        match kind {
            TransactionKind::Inflow => &self.income_categories,
            TransactionKind::Outflow => &self.expense_categories,
        }
    }

    /// Whether `category` is selectable for rows of `kind`.
    pub fn has_category(&self, kind: TransactionKind, category: &str) -> bool {
        self.categories_for(kind)
            .iter()
            .any(|candidate| candidate == category)
    }

    /// Whether `account` is in the account set.
    pub fn is_known_account(&self, account: &str) -> bool {
        self.accounts.iter().any(|candidate| candidate == account)
    }

    /// Load a config from a JSON file.
    ///
    /// # Errors
    /// Returns [Error::ConfigLoad] if the file cannot be read or does not
    /// parse as a [LedgerConfig].
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let config_load = |reason: String| Error::ConfigLoad {
            path: path.display().to_string(),
            reason,
        };

        let text = std::fs::read_to_string(path).map_err(|error| config_load(error.to_string()))?;

        serde_json::from_str(&text).map_err(|error| config_load(error.to_string()))
    }
}
