//! Input controller - chain selector, address field and submit button

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use crate::core::{Action, Module, NotifyLevel, Session};
use crate::domain::{validate_address, Chain, QueryParams, SampleRequest};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Chain,
    Address,
    Submit,
}

/// Result of pressing Submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Address failed the format check; nothing was sent
    Rejected(ValidationError),
    /// A request is already outstanding
    Busy,
    /// Query recorded; the request should be sent
    Dispatched { id: u64, request: SampleRequest },
}

#[derive(Debug, Clone)]
pub struct InputController {
    pub chain: Chain,
    pub address: String,
    pub focus: Field,
    /// Inline message under the address field
    pub validation_error: Option<String>,
}

impl InputController {
    pub fn from_query(query: &QueryParams) -> Self {
        let chain = if query.chain.is_selectable() {
            query.chain
        } else {
            Chain::default()
        };
        Self {
            chain,
            address: query.address.clone(),
            focus: Field::Address,
            validation_error: None,
        }
    }

    /// Validate and, if the address is well-formed, record the query and open
    /// a request. The session's query is untouched on rejection.
    pub fn submit(&mut self, session: &mut Session) -> Submission {
        if session.is_in_flight() {
            return Submission::Busy;
        }
        if let Err(err) = validate_address(&self.address) {
            info!(address = %self.address, "rejected address");
            self.validation_error = Some(err.to_string());
            return Submission::Rejected(err);
        }
        self.validation_error = None;

        let query = QueryParams::new(self.chain, self.address.clone());
        match session.begin_request(query) {
            Some((id, request)) => Submission::Dispatched { id, request },
            None => Submission::Busy,
        }
    }

    /// Try to switch chain; disabled chains are refused.
    pub fn select_chain(&mut self, chain: Chain) -> Action {
        if !chain.is_selectable() {
            return Action::Notify(
                format!("{} is not available. {}", chain, Chain::help_text()),
                NotifyLevel::Warn,
            );
        }
        self.chain = chain;
        Action::None
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
        self.validation_error = None;
    }

    /// Advance focus; returns false when moving past the last field.
    pub fn focus_next(&mut self) -> bool {
        match self.focus {
            Field::Chain => {
                self.focus = Field::Address;
                true
            }
            Field::Address => {
                self.focus = Field::Submit;
                true
            }
            Field::Submit => false,
        }
    }

    /// Move focus back; returns false when moving before the first field.
    pub fn focus_prev(&mut self) -> bool {
        match self.focus {
            Field::Chain => false,
            Field::Address => {
                self.focus = Field::Chain;
                true
            }
            Field::Submit => {
                self.focus = Field::Address;
                true
            }
        }
    }

    fn cycle_chain(&mut self, forward: bool) -> Action {
        let idx = Chain::ALL
            .iter()
            .position(|c| *c == self.chain)
            .unwrap_or(0);
        let len = Chain::ALL.len();
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        self.select_chain(Chain::ALL[next])
    }

    fn handle_address_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Enter => Action::Submit,
            KeyCode::Esc => Action::FocusNext,
            KeyCode::Backspace => {
                self.address.pop();
                self.validation_error = None;
                Action::None
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.set_address(String::new());
                Action::None
            }
            KeyCode::Char(ch) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Action::None;
                }
                self.address.push(ch);
                self.validation_error = None;
                Action::None
            }
            _ => Action::None,
        }
    }
}

impl Module for InputController {
    fn handle_key(&mut self, key: KeyEvent, session: &mut Session) -> Action {
        match self.focus {
            Field::Chain => match key.code {
                KeyCode::Left | KeyCode::Char('h') => self.cycle_chain(false),
                KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter | KeyCode::Char(' ') => {
                    self.cycle_chain(true)
                }
                _ => Action::None,
            },
            Field::Address => self.handle_address_key(key),
            Field::Submit => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    if session.is_in_flight() {
                        Action::Notify("Request in progress…".into(), NotifyLevel::Warn)
                    } else {
                        Action::Submit
                    }
                }
                _ => Action::None,
            },
        }
    }
}
