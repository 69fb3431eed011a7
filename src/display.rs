//! Text rendering of balances and history records.

use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{EmptyState, TransactionKind, TransactionRecord};

/// Shown in place of the balance while it is hidden
pub const MASKED_BALANCE: &str = "********";

const CURRENCY: &str = "FCFA";

/// Formats an amount with grouped thousands, e.g. `120 990` or `1 500,50`
///
/// Cents are only shown when there are any.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    let text = rounded.to_string();
    let (units, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (index, digit) in units.chars().enumerate() {
        if index > 0 && (units.len() - index) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    if amount < Decimal::ZERO && !rounded.is_zero() {
        grouped.insert(0, '-');
    }
    if cents != "00" {
        grouped.push(',');
        grouped.push_str(cents);
    }

    grouped
}

/// Formats an amount followed by the currency, e.g. `120 990 FCFA`
pub fn format_currency(amount: Decimal) -> String {
    format!("{} {}", format_amount(amount), CURRENCY)
}

/// The balance as shown to the user, or [`MASKED_BALANCE`] while hidden
pub fn balance_text(balance: Decimal, visible: bool) -> String {
    match visible {
        true => format_currency(balance),
        false => MASKED_BALANCE.to_owned(),
    }
}

/// What to show instead of an empty history page
pub fn empty_state_message(state: EmptyState) -> &'static str {
    match state {
        EmptyState::NoHistory => "No operations yet.",
        EmptyState::NoMatches => "No transfer found for this search.",
    }
}

/// One history record as a row of text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryLine {
    pub label: String,
    pub date: String,
    /// Signed: credits start with `+`, debits with `-`
    pub amount: String,
}

impl From<&TransactionRecord> for HistoryLine {
    fn from(record: &TransactionRecord) -> Self {
        let amount = format!("{}F", format_amount(record.amount()));
        let (label, amount) = match record.kind() {
            TransactionKind::Deposit => ("Deposit".to_owned(), format!("+{amount}")),
            TransactionKind::Withdrawal => ("Withdrawal".to_owned(), format!("-{amount}")),
            TransactionKind::Transfer => {
                let recipient = format!(
                    "{} {}",
                    record.recipient_last_name(),
                    record.recipient_first_name(),
                );
                let label = match recipient.trim() {
                    "" => "To an unknown recipient".to_owned(),
                    recipient => format!("To {recipient}"),
                };
                (label, format!("-{amount}"))
            }
        };

        Self {
            label,
            date: record.formatted_timestamp(),
            amount,
        }
    }
}

impl fmt::Display for HistoryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<32} {:<28} {:>14}", self.label, self.date, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::Ledger;

    #[test]
    fn amounts() {
        assert_eq!(format_amount(dec!(0)), "0");
        assert_eq!(format_amount(dec!(999)), "999");
        assert_eq!(format_amount(dec!(1000)), "1 000");
        assert_eq!(format_amount(dec!(120990)), "120 990");
        assert_eq!(format_amount(dec!(1234567.5)), "1 234 567,50");
        assert_eq!(format_amount(dec!(0.005)), "0,01");
        assert_eq!(format_amount(dec!(-1500.25)), "-1 500,25");
    }

    #[test]
    fn masked_balance() {
        assert_eq!(balance_text(dec!(120000), true), "120 000 FCFA");
        assert_eq!(balance_text(dec!(120000), false), "********");
    }

    #[test]
    fn history_lines() {
        let at = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(15, 4, 0)
            .unwrap();
        let mut ledger = Ledger::new(dec!(10000)).unwrap();

        let deposit = HistoryLine::from(&ledger.deposit(dec!(5000), at).unwrap().record);
        assert_eq!(deposit.label, "Deposit");
        assert_eq!(deposit.amount, "+5 000F");
        assert_eq!(deposit.date, "October 16, 2026 3:04 PM");

        let withdrawal = HistoryLine::from(&ledger.withdraw(dec!(20.5), at).unwrap().record);
        assert_eq!(withdrawal.amount, "-20,50F");

        let transfer = HistoryLine::from(&ledger.transfer(dec!(1000), "Jean", "Dupont", at).unwrap().record);
        assert_eq!(transfer.label, "To Dupont Jean");
        assert_eq!(transfer.amount, "-1 000F");

        let transfer = HistoryLine::from(&ledger.transfer(dec!(10), "Awa", "", at).unwrap().record);
        assert_eq!(transfer.label, "To Awa");
    }
}
