/// The five views of the interface. Exactly one is current at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    NewAccount,
    AccountMenu,
    Balance,
    ChangePin,
}

/// Pending balance operation, set when the balance view opens and cleared
/// when it is dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    None,
    Show,
    Deposit,
    Withdraw,
}

#[derive(Debug)]
pub struct Session {
    view: View,
    previous: Option<View>,
    active: Option<usize>,
    action: Action,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            view: View::Login,
            previous: None,
            active: None,
            action: Action::None,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_logged_in(&self) -> bool {
        self.active.is_some()
    }

    /// Makes `view` current, remembering the one it replaces for a single
    /// level of back navigation.
    pub fn open(&mut self, view: View) {
        self.previous = Some(self.view);
        self.view = view;
    }

    pub fn back(&mut self) {
        if let Some(previous) = self.previous {
            self.open(previous);
        }
    }

    pub fn set_action(&mut self, action: Action) {
        self.action = action;
    }

    pub fn clear_action(&mut self) {
        self.action = Action::None;
    }

    pub fn log_in(&mut self, index: usize) {
        self.active = Some(index);
    }

    pub fn log_out(&mut self) {
        self.active = None;
    }
}
