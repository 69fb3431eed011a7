use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// The different kinds of transactions recorded in the wallet history
///
/// The serialized names are the labels the wallet has always stored under the
/// `historique` key, so existing histories keep loading.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub enum TransactionKind {
    /// A credit to the wallet balance
    #[serde(rename = "Dépôt")]
    Deposit,
    /// A debit from the wallet balance
    #[serde(rename = "Retrait")]
    Withdrawal,
    /// A debit to a named recipient, charged with a fee
    #[serde(rename = "Transfert")]
    Transfer,
}

/// The recipient of a transfer
///
/// At least one of both names is present on every recipient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recipient {
    first_name: String,
    last_name: String,
}

impl Recipient {
    /// Creates a recipient from the trimmed names
    ///
    /// Returns `None` if both names are blank.
    pub fn new(first_name: &str, last_name: &str) -> Option<Self> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        if first_name.is_empty() && last_name.is_empty() {
            return None;
        }

        Some(Self {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
        })
    }

    /// The trimmed first name, possibly empty
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// The trimmed last name, possibly empty
    pub fn last_name(&self) -> &str {
        &self.last_name
    }
}

/// One completed wallet operation
///
/// Records are created by the [`Ledger`](crate::Ledger) once an operation
/// succeeded and are never modified afterwards.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct TransactionRecord {
    #[serde(rename = "type")]
    kind: TransactionKind,
    #[serde(rename = "montant")]
    amount: Decimal,
    #[serde(rename = "frais", default)]
    fee: Decimal,
    #[serde(rename = "destinataireNom", default)]
    recipient_last_name: String,
    #[serde(rename = "destinatairePrenom", default)]
    recipient_first_name: String,
    #[serde(rename = "date", with = "timestamp_format")]
    timestamp: NaiveDateTime,
}

impl TransactionRecord {
    pub(crate) fn deposit(amount: Decimal, timestamp: NaiveDateTime) -> Self {
        Self::new(TransactionKind::Deposit, amount, Decimal::ZERO, None, timestamp)
    }

    pub(crate) fn withdrawal(amount: Decimal, timestamp: NaiveDateTime) -> Self {
        Self::new(TransactionKind::Withdrawal, amount, Decimal::ZERO, None, timestamp)
    }

    pub(crate) fn transfer(
        amount: Decimal,
        fee: Decimal,
        recipient: Recipient,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self::new(TransactionKind::Transfer, amount, fee, Some(recipient), timestamp)
    }

    fn new(
        kind: TransactionKind,
        amount: Decimal,
        fee: Decimal,
        recipient: Option<Recipient>,
        timestamp: NaiveDateTime,
    ) -> Self {
        let (recipient_first_name, recipient_last_name) = recipient
            .map(|recipient| (recipient.first_name, recipient.last_name))
            .unwrap_or_default();

        Self {
            kind,
            amount,
            fee,
            recipient_first_name,
            recipient_last_name,
            timestamp: timestamp_format::truncate(timestamp),
        }
    }

    /// The kind of the operation
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// The amount moved, excluding any fee
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The fee charged on top of the amount
    /// Will only be non-zero for transfers
    pub fn fee(&self) -> Decimal {
        self.fee
    }

    /// The amount plus the fee, i.e. what the balance was debited or credited by
    pub fn total(&self) -> Decimal {
        self.amount + self.fee
    }

    /// Will only be populated for transfers
    pub fn recipient_first_name(&self) -> &str {
        &self.recipient_first_name
    }

    /// Will only be populated for transfers
    pub fn recipient_last_name(&self) -> &str {
        &self.recipient_last_name
    }

    /// The local time the operation happened, to the minute
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// The timestamp the way it is stored, e.g. `October 16, 2026 3:04 PM`
    pub fn formatted_timestamp(&self) -> String {
        timestamp_format::format(&self.timestamp)
    }
}

/// Stores timestamps in the human readable `October 16, 2026 3:04 PM` form
///
/// The stored form has no seconds, so timestamps are truncated to the minute
/// when a record is created. Otherwise a record would not survive a round trip.
mod timestamp_format {
    use chrono::{NaiveDateTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%B %-d, %Y %-I:%M %p";

    pub(super) fn truncate(timestamp: NaiveDateTime) -> NaiveDateTime {
        timestamp
            .date()
            .and_hms_opt(timestamp.hour(), timestamp.minute(), 0)
            .unwrap_or(timestamp)
    }

    pub(super) fn format(timestamp: &NaiveDateTime) -> String {
        timestamp.format(FORMAT).to_string()
    }

    pub(super) fn serialize<S>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        serializer.collect_str(&timestamp.format(FORMAT))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
        where D: Deserializer<'de>
    {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(text.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}
