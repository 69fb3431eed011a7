use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{Account, AccountError, Recipient, TransactionRecord};

/// The share of a transfer charged as fee (1%)
pub const TRANSFER_FEE_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Fees are charged in whole cents
const FEE_DECIMAL_PLACES: u32 = 2;

/// Possible errors to occur when applying an operation to the ledger
///
/// None of these leave a trace: a failed operation never changes the balance
/// and never produces a record.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error("Please enter a valid amount greater than zero")]
    InvalidAmount,
    #[error("Please enter at least the first or the last name of the recipient")]
    MissingRecipient,
    #[error("A fee rate of {0} is negative")]
    NegativeFeeRate(Decimal),
}

impl LedgerError {
    /// Whether the operation was rejected because the balance was too low
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, LedgerError::Account(AccountError::InsufficientFunds))
    }
}

/// The outcome of a successful operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// The balance after the operation
    pub balance: Decimal,
    /// The record to append to the history
    pub record: TransactionRecord,
}

/// What a transfer of some amount would cost
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferQuote {
    pub amount: Decimal,
    pub fee: Decimal,
    /// `amount + fee`, the sum debited from the balance
    pub total: Decimal,
}

/// Validates and applies all balance-changing operations
#[derive(Clone, Debug)]
pub struct Ledger {
    account: Account,
    fee_rate: Decimal,
}

impl Ledger {
    /// Creates a ledger holding the specified balance, charging [`TRANSFER_FEE_RATE`]
    pub fn new(balance: Decimal) -> Result<Self, LedgerError> {
        Ok(Self {
            account: Account::new(balance)?,
            fee_rate: TRANSFER_FEE_RATE,
        })
    }

    /// Replaces the fee rate charged on transfers
    ///
    /// A rate of zero makes transfers free; negative rates are rejected.
    pub fn with_fee_rate(mut self, fee_rate: Decimal) -> Result<Self, LedgerError> {
        if fee_rate < Decimal::ZERO {
            return Err(LedgerError::NegativeFeeRate(fee_rate));
        }
        self.fee_rate = fee_rate;

        Ok(self)
    }

    /// The current balance
    pub fn balance(&self) -> Decimal {
        self.account.balance()
    }

    /// The fee rate charged on transfers
    pub fn fee_rate(&self) -> Decimal {
        self.fee_rate
    }

    /// Credits the balance
    pub fn deposit(&mut self, amount: Decimal, at: NaiveDateTime) -> Result<Receipt, LedgerError> {
        let amount = check_amount(amount)?;
        self.account.deposit(amount)?;

        Ok(self.receipt(TransactionRecord::deposit(amount, at)))
    }

    /// Debits the balance, if it holds at least `amount`
    pub fn withdraw(&mut self, amount: Decimal, at: NaiveDateTime) -> Result<Receipt, LedgerError> {
        let amount = check_amount(amount)?;
        self.account.withdrawal(amount)?;

        Ok(self.receipt(TransactionRecord::withdrawal(amount, at)))
    }

    /// Debits the amount plus the transfer fee in favor of the recipient
    ///
    /// The amount is validated first, the recipient second, and the funds last.
    pub fn transfer(
        &mut self,
        amount: Decimal,
        recipient_first_name: &str,
        recipient_last_name: &str,
        at: NaiveDateTime,
    ) -> Result<Receipt, LedgerError> {
        let quote = self.quote_transfer(amount)?;
        let recipient = Recipient::new(recipient_first_name, recipient_last_name)
            .ok_or(LedgerError::MissingRecipient)?;
        self.account.withdrawal(quote.total)?;

        Ok(self.receipt(TransactionRecord::transfer(quote.amount, quote.fee, recipient, at)))
    }

    /// Computes fee and total of a transfer without touching the balance
    pub fn quote_transfer(&self, amount: Decimal) -> Result<TransferQuote, LedgerError> {
        let amount = check_amount(amount)?;
        let fee = amount
            .checked_mul(self.fee_rate)
            .ok_or(AccountError::Overflow)?
            .round_dp_with_strategy(FEE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        let total = amount.checked_add(fee).ok_or(AccountError::Overflow)?;

        Ok(TransferQuote { amount, fee, total })
    }

    fn receipt(&self, record: TransactionRecord) -> Receipt {
        Receipt {
            balance: self.balance(),
            record,
        }
    }
}

/// Parses an amount typed by a user
///
/// Anything that is not a plain decimal number greater than zero is rejected.
pub fn parse_amount(input: &str) -> Result<Decimal, LedgerError> {
    let amount = Decimal::from_str(input.trim()).map_err(|_| LedgerError::InvalidAmount)?;
    check_amount(amount)
}

fn check_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    match amount > Decimal::ZERO {
        true => Ok(amount.normalize()),
        false => Err(LedgerError::InvalidAmount),
    }
}
