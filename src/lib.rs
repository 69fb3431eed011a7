//! A simulated mobile wallet: a balance guarded by a small ledger, a
//! searchable newest-first transaction history, and QR payloads describing
//! the balance. All state lives in a local key-value store.

pub use self::{
    account::{Account, AccountError},
    config::{
        WalletConfig, DEFAULT_INITIAL_BALANCE, DEFAULT_QR_REFRESH_INTERVAL, DEFAULT_USER_ID,
    },
    display::{
        balance_text, empty_state_message, format_amount, format_currency, HistoryLine,
        MASKED_BALANCE,
    },
    history::{EmptyState, History, HistoryCursor, HistoryPage, SearchTerm, DEFAULT_PAGE_SIZE},
    ledger::{parse_amount, Ledger, LedgerError, Receipt, TransferQuote, TRANSFER_FEE_RATE},
    qr::{QrPayload, QrRefresher},
    storage::{FileStore, KeyValueStore, MemoryStore, StorageError, BALANCE_KEY, HISTORY_KEY},
    transaction::{Recipient, TransactionKind, TransactionRecord},
    wallet::{Clock, SystemClock, Wallet, WalletError},
};

mod account;
mod config;
mod display;
mod history;
mod ledger;
mod qr;
mod storage;
mod transaction;
mod wallet;
