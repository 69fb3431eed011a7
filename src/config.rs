use std::time::Duration;

use rust_decimal::Decimal;

use crate::{DEFAULT_PAGE_SIZE, TRANSFER_FEE_RATE};

/// The balance of a wallet that has never been used
pub const DEFAULT_INITIAL_BALANCE: Decimal = Decimal::from_parts(120_000, 0, 0, false, 0);
/// The account identifier embedded in QR payloads
pub const DEFAULT_USER_ID: &str = "USER123";
/// How often the QR payload is regenerated
pub const DEFAULT_QR_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// The settings of a wallet
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletConfig {
    /// Used when nothing is persisted yet
    pub initial_balance: Decimal,
    /// The share of a transfer charged as fee
    pub fee_rate: Decimal,
    /// How many history records a "load more" yields
    pub page_size: usize,
    pub user_id: String,
    pub qr_refresh_interval: Duration,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            initial_balance: DEFAULT_INITIAL_BALANCE,
            fee_rate: TRANSFER_FEE_RATE,
            page_size: DEFAULT_PAGE_SIZE,
            user_id: DEFAULT_USER_ID.to_owned(),
            qr_refresh_interval: DEFAULT_QR_REFRESH_INTERVAL,
        }
    }
}
