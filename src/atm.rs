use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::account::Account;
use crate::error::{AtmError, StorageError};
use crate::notice::{Notice, NoticeDelays};
use crate::record::{SCHEMA_VERSION, StoredState};
use crate::session::{Action, Session, View};
use crate::store::KeyValueStore;

/// Key under which the whole account collection is persisted.
pub const STORAGE_KEY: &str = "data_atm";

/// Drives every user-facing operation: owns the account collection, the
/// session state and the backing store. Each operation validates in order,
/// stops at the first failure and surfaces exactly one error.
pub struct Atm<S> {
    accounts: Vec<Account>,
    session: Session,
    store: S,
    delays: NoticeDelays,
}

impl<S: KeyValueStore> Atm<S> {
    /// Loads the persisted accounts and starts a logged-out session.
    pub fn open(store: S) -> Result<Self, StorageError> {
        Self::with_delays(store, NoticeDelays::default())
    }

    pub fn with_delays(store: S, delays: NoticeDelays) -> Result<Self, StorageError> {
        let accounts = load_accounts(&store)?;
        info!(count = accounts.len(), "accounts loaded");
        Ok(Atm {
            accounts,
            session: Session::new(),
            store,
            delays,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn delays(&self) -> &NoticeDelays {
        &self.delays
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn active_account(&self) -> Option<&Account> {
        self.session.active().and_then(|index| self.accounts.get(index))
    }

    /// Looks the PIN up and opens a session on the matching account.
    pub fn login(&mut self, pin: &str) -> Result<(), AtmError> {
        match self.accounts.iter().position(|account| account.pin() == pin) {
            Some(index) => {
                self.open_account_session(index);
                Ok(())
            }
            None => Err(AtmError::AccountNotFound),
        }
    }

    /// Closes the session and returns to the login view.
    pub fn logout(&mut self) {
        self.session.log_out();
        self.session.open(View::Login);
        debug!("session closed");
    }

    pub fn open_new_account(&mut self) {
        self.session.open(View::NewAccount);
    }

    /// Validates the new-account form values and opens a session on the
    /// freshly created account. `balance` is the raw form value; blank
    /// defaults to 0.00.
    pub fn create_account(&mut self, pin: &str, name: &str, balance: &str) -> Result<(), AtmError> {
        if self.pin_exists(pin) {
            return Err(AtmError::InvalidPin(None));
        }
        let balance = parse_amount(balance, "Balance")?;
        if balance.is_some_and(|balance| balance < Decimal::ZERO) {
            return Err(AtmError::NegativeNumber("Balance"));
        }
        self.accounts.push(Account::new(pin, name, balance));
        self.persist();
        self.open_account_session(self.accounts.len() - 1);
        Ok(())
    }

    /// Opens the balance view for `action`. For `Show` the returned string
    /// is the current balance, prefilled read-only into the amount field;
    /// deposit and withdrawal start from a cleared field.
    pub fn open_balance(&mut self, action: Action) -> Result<Option<String>, AtmError> {
        let index = self.active_index()?;
        self.session.set_action(action);
        self.session.open(View::Balance);
        Ok(match action {
            Action::Show => Some(self.accounts[index].balance_display()),
            Action::None | Action::Deposit | Action::Withdraw => None,
        })
    }

    /// Applies the pending balance action to the active account. On success
    /// the new balance is confirmed with an extended-duration notice and the
    /// session returns to the account menu.
    pub fn submit_balance(&mut self, amount: &str) -> Result<Option<Notice>, AtmError> {
        let index = self.active_index()?;
        let operation = match self.session.action() {
            Action::None | Action::Show => {
                self.cancel();
                return Ok(None);
            }
            operation @ (Action::Deposit | Action::Withdraw) => operation,
        };
        let amount = parse_amount(amount, "Amount")?.ok_or(AtmError::InvalidNumber("Amount"))?;
        if amount <= Decimal::ZERO {
            return Err(AtmError::NonPositiveNumber("Amount"));
        }

        let account = &mut self.accounts[index];
        let applied = match operation {
            Action::Withdraw => account.withdraw(amount),
            _ => account.deposit(amount),
        };
        if let Err(cause) = applied {
            debug!(%cause, "balance operation refused");
            return Err(match operation {
                Action::Withdraw => AtmError::InvalidWithdrawal(account.balance()),
                _ => AtmError::InvalidOperation("operation"),
            });
        }

        let confirmation = Notice::success(
            format!("Current balance: {}", self.accounts[index].balance_display()),
            self.delays.confirm,
        );
        self.persist();
        self.cancel();
        Ok(Some(confirmation))
    }

    pub fn open_change_pin(&mut self) -> Result<(), AtmError> {
        self.active_index()?;
        self.session.open(View::ChangePin);
        Ok(())
    }

    /// Replaces the active account's PIN after checking the current PIN,
    /// PIN uniqueness and the confirmation value, in that order. Changing a
    /// PIN to its own current value is refused like any other taken PIN.
    pub fn change_pin(
        &mut self,
        current: &str,
        new_pin: &str,
        confirm: &str,
    ) -> Result<Notice, AtmError> {
        let index = self.active_index()?;
        if self.accounts[index].pin() != current {
            return Err(AtmError::IncorrectPin);
        }
        if self.pin_exists(new_pin) {
            return Err(AtmError::InvalidPin(Some("new")));
        }
        if new_pin != confirm {
            return Err(AtmError::NewPinMismatch);
        }
        self.accounts[index].set_pin(new_pin);
        self.persist();
        self.session.back();
        Ok(Notice::success("PIN changed successfully.", self.delays.message))
    }

    /// Dismisses the current form view: pending action cleared, one view
    /// back.
    pub fn cancel(&mut self) {
        self.session.clear_action();
        self.session.back();
    }

    pub fn pin_exists(&self, pin: &str) -> bool {
        self.accounts.iter().any(|account| account.pin() == pin)
    }

    fn active_index(&self) -> Result<usize, AtmError> {
        self.session.active().ok_or(AtmError::AccountNotFound)
    }

    fn open_account_session(&mut self, index: usize) {
        self.session.log_in(index);
        self.session.open(View::AccountMenu);
        info!(name = self.accounts[index].name(), "session opened");
    }

    // Rewrites the whole collection under STORAGE_KEY. The store is treated
    // as infallible; a serialization failure is logged and dropped.
    fn persist(&mut self) {
        match serde_json::to_string(&StoredState::capture(&self.accounts)) {
            Ok(raw) => {
                self.store.set(STORAGE_KEY, &raw);
                debug!(count = self.accounts.len(), "accounts persisted");
            }
            Err(error) => warn!(%error, "failed to serialize accounts"),
        }
    }
}

fn load_accounts(store: &impl KeyValueStore) -> Result<Vec<Account>, StorageError> {
    let Some(raw) = store.get(STORAGE_KEY) else {
        return Ok(Vec::new());
    };
    let state: StoredState = serde_json::from_str(&raw)?;
    if state.version != SCHEMA_VERSION {
        return Err(StorageError::UnsupportedVersion(state.version));
    }
    state
        .accounts
        .into_iter()
        .map(|record| Account::try_from(record).map_err(StorageError::from))
        .collect()
}

// Blank input parses to None; anything else must be a decimal number.
fn parse_amount(raw: &str, label: &'static str) -> Result<Option<Decimal>, AtmError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<Decimal>()
        .map(Some)
        .map_err(|_| AtmError::InvalidNumber(label))
}
