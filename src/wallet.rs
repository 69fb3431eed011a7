use std::str::FromStr;

use chrono::{DateTime, Local};
use rust_decimal::Decimal;

use crate::{
    balance_text, History, HistoryCursor, HistoryPage, KeyValueStore, Ledger, LedgerError, QrPayload,
    Receipt, StorageError, TransferQuote, WalletConfig, BALANCE_KEY, HISTORY_KEY,
};

/// Possible errors to occur while operating the wallet
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The source of "now" for new records and QR payloads
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// The local system time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A wallet: balance, history, and the store both are persisted to
///
/// Every successful operation is written to the store before it returns:
/// first the history, then the balance. An operation that cannot be written
/// leaves the wallet as it was.
#[derive(Debug)]
pub struct Wallet<S, C = SystemClock> {
    store: S,
    clock: C,
    config: WalletConfig,
    ledger: Ledger,
    history: History,
    cursor: HistoryCursor,
    balance_visible: bool,
}

impl<S: KeyValueStore> Wallet<S> {
    /// Restores the wallet persisted in `store`
    pub fn open(store: S, config: WalletConfig) -> Result<Self, WalletError> {
        Self::with_clock(store, config, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> Wallet<S, C> {
    /// Restores the wallet persisted in `store`, taking time from `clock`
    ///
    /// A missing or unreadable balance falls back to the configured initial
    /// balance. A missing history is an empty one. A page size of zero is
    /// raised to one.
    pub fn with_clock(store: S, mut config: WalletConfig, clock: C) -> Result<Self, WalletError> {
        config.page_size = config.page_size.max(1);
        let balance = match store.get(BALANCE_KEY)? {
            Some(stored) => Decimal::from_str(stored.trim()).unwrap_or_else(|_| {
                tracing::warn!(%stored, "stored balance is not a number, using the initial balance");
                config.initial_balance
            }),
            None => config.initial_balance,
        };
        let history = match store.get(HISTORY_KEY)? {
            Some(stored) => serde_json::from_str(&stored).map_err(StorageError::from)?,
            None => History::new(),
        };
        let ledger = Ledger::new(balance)?.with_fee_rate(config.fee_rate)?;
        tracing::info!(%balance, records = history.len(), "opened wallet");

        Ok(Self {
            store,
            clock,
            cursor: HistoryCursor::new(config.page_size),
            config,
            ledger,
            history,
            balance_visible: true,
        })
    }

    /// The current balance
    pub fn balance(&self) -> Decimal {
        self.ledger.balance()
    }

    /// All recorded operations, most recent first
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The settings the wallet was opened with
    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    /// The store the wallet persists to
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Closes the wallet, handing back its store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Credits the balance and records a deposit
    pub fn deposit(&mut self, amount: Decimal) -> Result<Receipt, WalletError> {
        let now = self.clock.now().naive_local();
        self.apply("deposit", |ledger| ledger.deposit(amount, now))
    }

    /// Debits the balance and records a withdrawal
    pub fn withdraw(&mut self, amount: Decimal) -> Result<Receipt, WalletError> {
        let now = self.clock.now().naive_local();
        self.apply("withdrawal", |ledger| ledger.withdraw(amount, now))
    }

    /// Debits amount and fee and records a transfer to the recipient
    pub fn transfer(
        &mut self,
        amount: Decimal,
        recipient_first_name: &str,
        recipient_last_name: &str,
    ) -> Result<Receipt, WalletError> {
        let now = self.clock.now().naive_local();
        self.apply("transfer", |ledger| {
            ledger.transfer(amount, recipient_first_name, recipient_last_name, now)
        })
    }

    /// What a transfer of `amount` would cost
    pub fn quote_transfer(&self, amount: Decimal) -> Result<TransferQuote, WalletError> {
        Ok(self.ledger.quote_transfer(amount)?)
    }

    /// Runs `operation` on a copy of the ledger and only keeps the outcome
    /// once it is persisted
    fn apply<F>(&mut self, name: &'static str, operation: F) -> Result<Receipt, WalletError>
        where F: FnOnce(&mut Ledger) -> Result<Receipt, LedgerError>
    {
        let mut ledger = self.ledger.clone();
        let receipt = match operation(&mut ledger) {
            Ok(receipt) => receipt,
            Err(error) => {
                tracing::warn!(operation = name, %error, "operation rejected");
                return Err(error.into());
            }
        };

        let mut history = self.history.clone();
        history.append(receipt.record.clone());
        if let Err(error) = self.persist(receipt.balance, &history) {
            tracing::error!(operation = name, %error, "could not persist the wallet, operation dropped");
            return Err(error.into());
        }

        self.ledger = ledger;
        self.history = history;
        self.cursor.reset();
        tracing::info!(
            operation = name,
            amount = %receipt.record.amount(),
            fee = %receipt.record.fee(),
            balance = %receipt.balance,
            "operation applied",
        );

        Ok(receipt)
    }

    /// Writes the history, then the balance
    ///
    /// If the balance cannot be written, the previous history is written back
    /// so both entries keep describing the same state.
    fn persist(&mut self, balance: Decimal, history: &History) -> Result<(), StorageError> {
        self.store.set(HISTORY_KEY, &serde_json::to_string(history)?)?;

        if let Err(error) = self.store.set(BALANCE_KEY, &balance.to_string()) {
            let restored = serde_json::to_string(&self.history)
                .map_err(StorageError::from)
                .and_then(|previous| self.store.set(HISTORY_KEY, &previous));
            if let Err(restore_error) = restored {
                tracing::error!(%restore_error, "could not restore the previous history");
            }
            return Err(error);
        }

        Ok(())
    }

    /// The slice `[offset, offset + page_size)` of the history matching `term`
    ///
    /// A blank term pages through the whole history.
    pub fn page(&self, offset: usize, term: &str) -> HistoryPage<'_> {
        self.history.search(offset, self.config.page_size, term)
    }

    /// Starts browsing the history anew with another search term
    pub fn search(&mut self, term: &str) {
        self.cursor.search(term);
    }

    /// The next page of the history being browsed
    pub fn load_more(&mut self) -> HistoryPage<'_> {
        self.cursor.load_more(&self.history)
    }

    /// Where browsing the history currently stands
    pub fn cursor(&self) -> &HistoryCursor {
        &self.cursor
    }

    /// Whether the balance is shown or masked
    pub fn is_balance_visible(&self) -> bool {
        self.balance_visible
    }

    /// Hides a visible balance and reveals a hidden one
    pub fn toggle_balance_visibility(&mut self) -> bool {
        self.balance_visible = !self.balance_visible;
        self.balance_visible
    }

    /// The balance as shown to the user, masked while hidden
    pub fn display_balance(&self) -> String {
        balance_text(self.balance(), self.balance_visible)
    }

    /// A fresh QR payload for the current balance
    pub fn qr_payload(&self) -> QrPayload {
        QrPayload::new(
            self.balance(),
            self.config.user_id.as_str(),
            self.clock.now().timestamp_millis(),
        )
    }
}
