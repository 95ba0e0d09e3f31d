use rust_decimal::Decimal;
use thiserror::Error;

/// Balance is private: it never goes below zero and only moves through
/// [`Account::deposit`] and [`Account::withdraw`].
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pin: String,
    name: String,
    balance: Decimal,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BalanceError {
    #[error("Deposit amount is negative")]
    NegativeAmount,
    #[error("Withdrawal would overdraw the balance")]
    Overdraft,
}

impl Account {
    pub fn new(pin: impl Into<String>, name: impl Into<String>, balance: Option<Decimal>) -> Self {
        Account {
            pin: pin.into(),
            name: name.into(),
            balance: balance.unwrap_or(Decimal::ZERO),
        }
    }

    // Zero is a valid deposit at this layer; input forms reject it earlier.
    pub fn deposit(&mut self, amount: Decimal) -> Result<(), BalanceError> {
        if amount < Decimal::ZERO {
            return Err(BalanceError::NegativeAmount);
        }
        self.balance += amount;
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), BalanceError> {
        if self.balance - amount < Decimal::ZERO {
            return Err(BalanceError::Overdraft);
        }
        self.balance -= amount;
        Ok(())
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn pin(&self) -> &str {
        &self.pin
    }

    // No uniqueness check here; the controller owns that rule.
    pub fn set_pin(&mut self, new_pin: impl Into<String>) {
        self.pin = new_pin.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Balance rendered with exactly two decimal places.
    pub fn balance_display(&self) -> String {
        format!("{:.2}", self.balance.round_dp(2))
    }
}
