use rust_decimal::Decimal;

/// Possible errors to occur during balance operations
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    #[error("The account does not hold enough funds")]
    InsufficientFunds,
    #[error("A balance of {0} is negative")]
    NegativeBalance(Decimal),
    #[error("The balance would exceed the largest representable amount")]
    Overflow,
}

/// The wallet account
///
/// The balance of an account never drops below zero. Operations that would
/// make it negative fail and leave the balance as it was.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    balance: Decimal,
}

impl Account {
    /// Opens an account holding the specified balance
    pub fn new(balance: Decimal) -> Result<Self, AccountError> {
        if balance < Decimal::ZERO {
            return Err(AccountError::NegativeBalance(balance));
        }

        Ok(Self { balance })
    }

    /// The funds currently held
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Adds `amount` to the balance
    pub fn deposit(&mut self, amount: Decimal) -> Result<(), AccountError> {
        self.balance = self.balance
            .checked_add(amount)
            .ok_or(AccountError::Overflow)?;

        Ok(())
    }

    /// Takes `amount` off the balance, unless that would make it negative
    pub fn withdrawal(&mut self, amount: Decimal) -> Result<(), AccountError> {
        self.check_funds(amount)?;
        self.balance -= amount;

        Ok(())
    }

    /// Fails if withdrawing `amount` would leave a negative balance
    pub fn check_funds(&self, amount: Decimal) -> Result<(), AccountError> {
        match self.balance >= amount {
            true => Ok(()),
            false => Err(AccountError::InsufficientFunds),
        }
    }
}
