use std::io::Write;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use wallet_engine::{
    empty_state_message, format_currency, parse_amount, FileStore, HistoryLine, QrPayload,
    QrRefresher, Wallet, WalletConfig,
};

/// A command line interface to a simulated mobile wallet
#[derive(Debug, Parser)]
#[clap(version)]
struct Args {
    /// The file the wallet state is kept in
    #[clap(long, default_value = "wallet.json")]
    store: std::path::PathBuf,
    /// The balance of a wallet that has never been used
    #[clap(long)]
    initial_balance: Option<Decimal>,
    /// The share of a transfer charged as fee, e.g. 0.01
    #[clap(long)]
    fee_rate: Option<Decimal>,
    /// How many history records are shown per page
    #[clap(long)]
    page_size: Option<usize>,
    /// The account identifier embedded in QR payloads
    #[clap(long)]
    user_id: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Shows the balance
    Balance {
        /// Masks the balance
        #[clap(long)]
        hide: bool,
    },
    /// Credits the balance
    Deposit { amount: String },
    /// Debits the balance
    Withdraw { amount: String },
    /// Sends money to a recipient, charging a fee
    Transfer {
        amount: String,
        #[clap(long, default_value = "")]
        first_name: String,
        #[clap(long, default_value = "")]
        last_name: String,
    },
    /// Shows the fee and total of a transfer without sending it
    Quote { amount: String },
    /// Lists past operations, most recent first
    History {
        /// The page to show, starting at 1
        #[clap(long, default_value = "1")]
        page: usize,
        /// Only shows transfers to recipients whose name contains this
        #[clap(long, default_value = "")]
        search: String,
    },
    /// Writes the whole history as CSV
    Export,
    /// Prints regenerated QR payloads
    Qr {
        /// How many payloads to print before exiting
        #[clap(long, default_value = "1")]
        ticks: usize,
        /// Seconds between two payloads
        #[clap(long)]
        interval: Option<u64>,
    },
}

impl Args {
    fn config(&self) -> WalletConfig {
        let mut config = WalletConfig::default();
        if let Some(initial_balance) = self.initial_balance {
            config.initial_balance = initial_balance;
        }
        if let Some(fee_rate) = self.fee_rate {
            config.fee_rate = fee_rate;
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size.max(1);
        }
        if let Some(user_id) = &self.user_id {
            config.user_id = user_id.clone();
        }

        config
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let stdout = std::io::stdout();
    run(args, &mut stdout.lock())
}

fn run(args: Args, out: &mut impl Write) -> anyhow::Result<()> {
    let store = FileStore::open(&args.store)
        .with_context(|| format!("failed to open the wallet at {}", args.store.display()))?;
    let mut wallet = Wallet::open(store, args.config())?;

    match args.command {
        Command::Balance { hide } => {
            if hide {
                wallet.toggle_balance_visibility();
            }
            writeln!(out, "{}", wallet.display_balance())?;
        }
        Command::Deposit { amount } => {
            let receipt = wallet.deposit(parse_amount(&amount)?).context("deposit failed")?;
            writeln!(
                out,
                "Deposit of {} completed. Current balance: {}.",
                format_currency(receipt.record.amount()),
                format_currency(receipt.balance),
            )?;
        }
        Command::Withdraw { amount } => {
            let receipt = wallet.withdraw(parse_amount(&amount)?).context("withdrawal failed")?;
            writeln!(
                out,
                "Withdrawal of {} completed. Current balance: {}.",
                format_currency(receipt.record.amount()),
                format_currency(receipt.balance),
            )?;
        }
        Command::Transfer { amount, first_name, last_name } => {
            let receipt = wallet
                .transfer(parse_amount(&amount)?, &first_name, &last_name)
                .context("transfer failed")?;
            let record = &receipt.record;
            writeln!(
                out,
                "Transfer of {} to {} {} (fee: {}) completed. Current balance: {}.",
                format_currency(record.amount()),
                record.recipient_last_name(),
                record.recipient_first_name(),
                format_currency(record.fee()),
                format_currency(receipt.balance),
            )?;
        }
        Command::Quote { amount } => {
            let quote = wallet.quote_transfer(parse_amount(&amount)?)?;
            writeln!(out, "Fee:   {}", format_currency(quote.fee))?;
            writeln!(out, "Total: {}", format_currency(quote.total))?;
        }
        Command::History { page, search } => {
            let offset = page.saturating_sub(1) * wallet.config().page_size;
            let history_page = wallet.page(offset, &search);

            if let Some(state) = history_page.empty_state() {
                writeln!(out, "{}", empty_state_message(state))?;
                return Ok(());
            }
            for record in history_page.records() {
                writeln!(out, "{}", HistoryLine::from(*record))?;
            }
            match history_page.has_more() {
                true => writeln!(out, "More with --page {}", page.max(1) + 1)?,
                false => writeln!(out, "End of history")?,
            }
        }
        Command::Export => {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(true)
                .from_writer(&mut *out);

            for record in wallet.history().records() {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        Command::Qr { ticks, interval } => {
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or(wallet.config().qr_refresh_interval);
            let balance = wallet.balance();
            let user_id = wallet.config().user_id.clone();
            let (payloads, received) = mpsc::channel();

            let mut refresher = QrRefresher::new(interval);
            refresher.start(move || {
                let now = chrono::Local::now().timestamp_millis();
                let _ = payloads.send(QrPayload::new(balance, user_id.as_str(), now));
            })?;
            for payload in received.iter().take(ticks.max(1)) {
                writeln!(out, "{payload}")?;
            }
            refresher.stop();
        }
    }

    Ok(())
}
