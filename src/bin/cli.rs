//! Command line interface for the cashflow ledger.
use std::{
    path::PathBuf,
    process::exit,
    sync::{Arc, Mutex},
};

use clap::{Parser, Subcommand, ValueEnum};
use rusqlite::Connection;
use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};
use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cashflow_rs::{
    FeeCharge, LedgerConfig, TransactionIntent, TransactionKind, balances_as_of, category_totals,
    compose, format_amount, initialize_db, parse_amount, persist_drafts, sorted_balances,
    sorted_category_totals,
    stores::{SQLiteTransactionStore, TransactionStore},
    total_balance, validate_draft, CATEGORY_TOP_UP,
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// A single-user cashflow ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the ledger's SQLite database.
    #[arg(long, default_value = "cashflow.db")]
    db_path: String,

    /// File path to a JSON file listing accounts and categories. The
    /// built-in defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a single income or expense.
    Record {
        /// Whether money comes in (masuk) or goes out (keluar).
        #[arg(long, value_enum)]
        kind: KindArg,

        /// The category for the transaction.
        #[arg(long)]
        category: String,

        /// The account the money moves into or out of.
        #[arg(long)]
        account: String,

        /// The amount in rupiah. Dots may be used as thousands separators,
        /// e.g. `50.000`.
        #[arg(long)]
        amount: String,

        /// A free-form description.
        #[arg(long, default_value = "")]
        description: String,

        /// The transaction date as `YYYY-MM-DD`. Defaults to today in local time.
        #[arg(long)]
        date: Option<String>,
    },

    /// Move money between two accounts, with an optional admin fee.
    Transfer {
        /// The account the money leaves.
        #[arg(long)]
        from: String,

        /// The account the money arrives in.
        #[arg(long)]
        to: String,

        /// The amount to move in rupiah.
        #[arg(long)]
        amount: String,

        /// The admin fee in rupiah, if any.
        #[arg(long, default_value = "0")]
        fee: String,

        /// Which account pays the admin fee.
        #[arg(long, value_enum, default_value = "source")]
        charge: ChargeArg,

        /// A description applied to both legs. Each leg gets a default
        /// naming the opposite account when omitted.
        #[arg(long, default_value = "")]
        description: String,

        /// The transfer date as `YYYY-MM-DD`. Defaults to today in local time.
        #[arg(long)]
        date: Option<String>,
    },

    /// Show per-account balances and the overall total.
    Balances {
        /// Count transactions up to and including this date. Defaults to
        /// today in local time.
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Show per-category totals for income or spending.
    Summary {
        /// Which side of the ledger to total.
        #[arg(long, value_enum, default_value = "keluar")]
        kind: KindArg,

        /// Only count transactions on or after this date.
        #[arg(long)]
        from: Option<String>,

        /// Only count transactions on or before this date.
        #[arg(long)]
        to: Option<String>,
    },

    /// List every ledger row, newest first.
    List,

    /// Change fields of a stored ledger row.
    Edit {
        /// The id of the row to change.
        #[arg(long)]
        id: i64,

        /// A new date as `YYYY-MM-DD`.
        #[arg(long)]
        date: Option<String>,

        /// A new kind.
        #[arg(long, value_enum)]
        kind: Option<KindArg>,

        /// A new category.
        #[arg(long)]
        category: Option<String>,

        /// A new account.
        #[arg(long)]
        account: Option<String>,

        /// A new amount in rupiah.
        #[arg(long)]
        amount: Option<String>,

        /// A new description.
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a ledger row.
    Delete {
        /// The id of the row to delete.
        #[arg(long)]
        id: i64,
    },
}

/// Mirror of [TransactionKind] using the user-facing labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Masuk,
    Keluar,
}

impl From<KindArg> for TransactionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Masuk => TransactionKind::Inflow,
            KindArg::Keluar => TransactionKind::Outflow,
        }
    }
}

/// Mirror of [FeeCharge] for the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ChargeArg {
    Source,
    Destination,
}

impl From<ChargeArg> for FeeCharge {
    fn from(charge: ChargeArg) -> Self {
        match charge {
            ChargeArg::Source => FeeCharge::Source,
            ChargeArg::Destination => FeeCharge::Destination,
        }
    }
}

fn main() {
    setup_logging();

    let args = Args::parse();

    if let Err(error) = run(args) {
        eprintln!("error: {error}");
        exit(1);
    }
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => LedgerConfig::from_json_file(path)?,
        None => LedgerConfig::default(),
    };

    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;
    let mut store = SQLiteTransactionStore::new(Arc::new(Mutex::new(connection)));

    match args.command {
        Command::Record {
            kind,
            category,
            account,
            amount,
            description,
            date,
        } => {
            let intent = TransactionIntent::Simple {
                date: parse_date_or_today(date.as_deref())?,
                kind: kind.into(),
                category,
                account,
                amount: parse_amount(&amount)?,
                description,
            };

            let transactions = persist_drafts(&mut store, compose(intent, &config)?)?;
            for transaction in transactions {
                println!(
                    "recorded #{}: {} {} {} ({})",
                    transaction.id,
                    transaction.account,
                    format_amount(transaction.signed_amount()),
                    transaction.category,
                    transaction.description,
                );
            }
        }
        Command::Transfer {
            from,
            to,
            amount,
            fee,
            charge,
            description,
            date,
        } => {
            let intent = TransactionIntent::Transfer {
                date: parse_date_or_today(date.as_deref())?,
                from_account: from,
                to_account: to,
                amount: parse_amount(&amount)?,
                description,
                fee: parse_amount(&fee)?,
                fee_charge: charge.into(),
            };

            let transactions = persist_drafts(&mut store, compose(intent, &config)?)?;
            for transaction in transactions {
                println!(
                    "recorded #{}: {} {} {} ({})",
                    transaction.id,
                    transaction.account,
                    format_amount(transaction.signed_amount()),
                    transaction.category,
                    transaction.description,
                );
            }
        }
        Command::Balances { as_of } => {
            let as_of = parse_date_or_today(as_of.as_deref())?;
            let transactions = store.select_all()?;
            let balances = balances_as_of(&transactions, as_of, &config.accounts);

            println!("Balances as of {}:", as_of.format(&DATE_FORMAT)?);
            for (account, balance) in sorted_balances(&balances) {
                println!("  {account:<16} {:>20}", format_amount(balance));
            }
            println!("  {:<16} {:>20}", "TOTAL", format_amount(total_balance(&balances)));
        }
        Command::Summary { kind, from, to } => {
            let kind = TransactionKind::from(kind);
            let mut transactions = store.select_all()?;

            if let Some(raw) = from.as_deref() {
                let from = Date::parse(raw, DATE_FORMAT)?;
                transactions.retain(|transaction| transaction.date >= from);
            }
            if let Some(raw) = to.as_deref() {
                let to = Date::parse(raw, DATE_FORMAT)?;
                transactions.retain(|transaction| transaction.date <= to);
            }

            // Transfers are money movement, not income or spending.
            let totals = category_totals(&transactions, kind, &[CATEGORY_TOP_UP]);

            println!("Totals per category ({kind}):");
            for (category, total) in sorted_category_totals(&totals) {
                println!("  {category:<24} {:>20}", format_amount(total));
            }
        }
        Command::List => {
            let mut transactions = store.select_all()?;
            transactions
                .sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));

            for transaction in transactions {
                let group = transaction
                    .transfer_group_id
                    .map(|group| format!(" [transfer {group}]"))
                    .unwrap_or_default();
                println!(
                    "#{} {} {} {} {} {}{}",
                    transaction.id,
                    transaction.date.format(&DATE_FORMAT)?,
                    transaction.kind,
                    transaction.account,
                    format_amount(transaction.signed_amount()),
                    transaction.description,
                    group,
                );
            }
        }
        Command::Edit {
            id,
            date,
            kind,
            category,
            account,
            amount,
            description,
        } => {
            let existing = store.get(id)?;
            // Edits keep the row in its transfer group; only delete breaks
            // a group up.
            let mut draft = existing.to_draft();

            if let Some(raw) = date.as_deref() {
                draft.date = Date::parse(raw, DATE_FORMAT)?;
            }
            if let Some(kind) = kind {
                draft.kind = kind.into();
            }
            if let Some(category) = category {
                draft.category = category;
            }
            if let Some(account) = account {
                draft.account = account;
            }
            if let Some(raw) = amount.as_deref() {
                draft.amount = parse_amount(raw)?;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            validate_draft(&draft, &config)?;

            let updated = store.update(id, draft)?;
            println!(
                "updated #{}: {} {} {} ({})",
                updated.id,
                updated.account,
                format_amount(updated.signed_amount()),
                updated.category,
                updated.description,
            );
        }
        Command::Delete { id } => {
            let transaction = store.get(id)?;

            if let Some(group) = transaction.transfer_group_id {
                let siblings: Vec<i64> = store
                    .select_all()?
                    .into_iter()
                    .filter(|other| other.id != id && other.transfer_group_id == Some(group))
                    .map(|other| other.id)
                    .collect();
                if !siblings.is_empty() {
                    warn!(
                        "row {id} is part of a transfer; rows {siblings:?} will remain and the \
                         transfer will no longer balance"
                    );
                }
            }

            store.delete(id)?;
            println!("deleted #{id}");
        }
    }

    Ok(())
}

fn parse_date_or_today(input: Option<&str>) -> Result<Date, time::error::Parse> {
    match input {
        Some(raw) => Date::parse(raw, DATE_FORMAT),
        None => Ok(local_today()),
    }
}

/// Today in the system's local timezone, falling back to UTC when the
/// local offset cannot be determined.
fn local_today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}
