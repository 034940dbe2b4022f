use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, info};

use crate::core::session::LastResult;
use crate::core::{parse_command, Action, Command, Module, NotifyLevel, Session};
use crate::domain::{Chain, FetchOutcome, SampleRequest};
use crate::error::TransportError;
use crate::modules::export::export_last_result;
use crate::modules::{Field, InputController, ResultsPanel, Submission};

const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Input,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

impl From<NotifyLevel> for StatusLevel {
    fn from(level: NotifyLevel) -> Self {
        match level {
            NotifyLevel::Info => StatusLevel::Info,
            NotifyLevel::Warn => StatusLevel::Warn,
            NotifyLevel::Error => StatusLevel::Error,
        }
    }
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    level: StatusLevel,
    since: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct CommandLine {
    pub input: String,
}

pub struct App {
    pub session: Session,
    pub input: InputController,
    pub results: ResultsPanel,
    pub pane: Pane,
    pub input_mode: InputMode,
    pub command: CommandLine,
    pub help_open: bool,
    pub should_quit: bool,
    pub backend_url: String,
    /// Configured alias for the active chain, shown in the header
    pub chain_alias: Option<String>,
    pub log_file: Option<String>,
    status: Option<StatusMessage>,
    pending_request: Option<(u64, SampleRequest)>,
    clipboard_request: Option<String>,
}

impl App {
    pub fn new(mut session: Session, backend_url: impl Into<String>) -> Self {
        session.query = std::mem::take(&mut session.query).into_selectable();
        let input = InputController::from_query(&session.query);
        Self {
            session,
            input,
            results: ResultsPanel::new(),
            pane: Pane::Input,
            input_mode: InputMode::Normal,
            command: CommandLine::default(),
            help_open: false,
            should_quit: false,
            backend_url: backend_url.into(),
            chain_alias: None,
            log_file: None,
            status: None,
            pending_request: None,
            clipboard_request: None,
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }

    pub fn submit_enabled(&self) -> bool {
        !self.session.is_in_flight()
    }

    pub fn share_query(&self) -> String {
        self.session.share_query()
    }

    pub fn focus_label(&self) -> &'static str {
        match (self.pane, self.input.focus) {
            (Pane::Results, _) => "Results",
            (Pane::Input, Field::Chain) => "Chain",
            (Pane::Input, Field::Address) => "Address",
            (Pane::Input, Field::Submit) => "Submit",
        }
    }

    /// True while keystrokes go into the address field
    pub fn is_typing(&self) -> bool {
        self.input_mode == InputMode::Command
            || (self.pane == Pane::Input && self.input.focus == Field::Address)
    }

    // === Submission lifecycle ===

    pub fn submit(&mut self) {
        match self.input.submit(&mut self.session) {
            Submission::Rejected(err) => self.set_status(err.to_string(), StatusLevel::Error),
            Submission::Busy => self.set_status("Request in progress…", StatusLevel::Warn),
            Submission::Dispatched { id, request } => {
                info!(id, query = %self.session.share_query(), "submitting sample request");
                self.results.show_loading();
                self.set_status(
                    format!("Fetching samples for {}…", request.address),
                    StatusLevel::Info,
                );
                self.pending_request = Some((id, request));
            }
        }
    }

    /// Request waiting to be handed to the runtime
    pub fn take_sample_request(&mut self) -> Option<(u64, SampleRequest)> {
        self.pending_request.take()
    }

    pub fn apply_sample_ready(&mut self, id: u64, outcome: FetchOutcome) {
        if !self.session.finish_request(id) {
            debug!(id, "ignoring stale sample result");
            return;
        }
        self.results.show_outcome(&outcome);
        match outcome {
            FetchOutcome::Records(records) => {
                if records.is_empty() {
                    self.set_status("No data available.", StatusLevel::Info);
                } else {
                    self.set_status(
                        format!("Fetched {} sampled transactions", records.len()),
                        StatusLevel::Info,
                    );
                    self.pane = Pane::Results;
                }
                self.session.last_result = Some(LastResult {
                    query: self.session.query.clone(),
                    records,
                    received_at: Local::now(),
                });
            }
            FetchOutcome::SoftError(message) => {
                self.set_status(format!("Warning: {message}"), StatusLevel::Warn);
            }
            FetchOutcome::Transport(err) => {
                self.set_status(format!("Request failed: {err}"), StatusLevel::Error);
            }
        }
    }

    /// The worker is gone; release any outstanding request as a transport error.
    pub fn apply_runtime_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        if let Some(id) = self.session.abort_request() {
            self.pending_request = None;
            self.results
                .show_outcome(&FetchOutcome::Transport(TransportError::Worker(message.clone())));
            debug!(id, "request aborted by runtime error");
        }
        self.set_status(message, StatusLevel::Error);
    }

    pub fn take_clipboard_request(&mut self) -> Option<String> {
        self.clipboard_request.take()
    }

    // === Input handling ===

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.help_open {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc) {
                self.help_open = false;
            }
            return;
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Command => self.handle_command_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        let typing = self.is_typing();
        match key.code {
            KeyCode::Tab => self.focus_next(),
            KeyCode::BackTab => self.focus_prev(),
            KeyCode::Char(':') if !typing => self.enter_command(),
            KeyCode::Char('?') if !typing => self.help_open = true,
            KeyCode::Char('q') if !typing => self.should_quit = true,
            _ => {
                let action = match self.pane {
                    Pane::Input => self.input.handle_key(key, &mut self.session),
                    Pane::Results => self.results.handle_key(key, &mut self.session),
                };
                self.apply_action(action);
            }
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.exit_command(),
            KeyCode::Enter => self.apply_command(),
            KeyCode::Backspace => {
                self.command.input.pop();
            }
            KeyCode::Char(ch) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return;
                }
                self.command.input.push(ch);
            }
            _ => {}
        }
    }

    pub fn focus_next(&mut self) {
        match self.pane {
            Pane::Input => {
                if !self.input.focus_next() {
                    self.pane = Pane::Results;
                }
            }
            Pane::Results => {
                self.pane = Pane::Input;
                self.input.focus = Field::Chain;
            }
        }
    }

    pub fn focus_prev(&mut self) {
        match self.pane {
            Pane::Input => {
                if !self.input.focus_prev() {
                    self.pane = Pane::Results;
                }
            }
            Pane::Results => {
                self.pane = Pane::Input;
                self.input.focus = Field::Submit;
            }
        }
    }

    pub fn enter_command(&mut self) {
        self.input_mode = InputMode::Command;
        self.command.input.clear();
    }

    pub fn exit_command(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command.input.clear();
    }

    pub fn apply_command(&mut self) {
        let command = parse_command(&self.command.input);
        self.exit_command();

        match command {
            Command::Submit => self.submit(),
            Command::Address(address) => {
                self.input.set_address(address);
                self.set_status("Address updated", StatusLevel::Info);
            }
            Command::Chain(name) => {
                let chain = Chain::from_wire(&name).or_else(|| {
                    Chain::ALL
                        .into_iter()
                        .find(|c| c.display_name().eq_ignore_ascii_case(name.trim()))
                });
                match chain {
                    Some(chain) => {
                        let action = self.input.select_chain(chain);
                        self.apply_action(action);
                    }
                    None => self.set_status(format!("Unknown chain: {name}"), StatusLevel::Error),
                }
            }
            Command::Export(target) => self.apply_action(Action::Export(target)),
            Command::Clear => {
                if self.session.is_in_flight() {
                    self.set_status("Request in progress…", StatusLevel::Warn);
                } else {
                    self.results.clear();
                    self.session.last_result = None;
                    self.input.validation_error = None;
                }
            }
            Command::Help => self.help_open = true,
            Command::Quit => self.should_quit = true,
            Command::Unknown(input) => {
                if !input.is_empty() {
                    self.set_status(format!("Unknown command: {input}"), StatusLevel::Error);
                }
            }
        }
    }

    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Submit => self.submit(),
            Action::Notify(text, level) => self.set_status(text, level.into()),
            Action::Copy(text) => {
                self.session.set_clipboard(text.clone());
                self.clipboard_request = Some(text);
            }
            Action::Export(target) => {
                let result = export_last_result(&self.session, target.as_deref());
                self.apply_action(result);
            }
            Action::FocusNext => self.focus_next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QueryParams;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(Session::default(), "http://127.0.0.1:8080")
    }

    #[test]
    fn test_typing_q_into_address_does_not_quit() {
        let mut app = app();
        assert!(app.is_typing());
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.input.address, "q");
    }

    #[test]
    fn test_tab_cycles_through_panes() {
        let mut app = app();
        assert_eq!(app.focus_label(), "Address");
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus_label(), "Submit");
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus_label(), "Results");
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.focus_label(), "Chain");
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.focus_label(), "Results");
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_command_palette_sets_address_and_chain() {
        let mut app = app();
        app.pane = Pane::Results;
        app.handle_key(key(KeyCode::Char(':')));
        assert_eq!(app.input_mode, InputMode::Command);
        for ch in "addr 0xabc".chars() {
            app.handle_key(key(KeyCode::Char(ch)));
        }
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.input.address, "0xabc");

        app.command.input = "chain arbitrum".into();
        app.apply_command();
        assert_eq!(app.input.chain, Chain::Ethereum);
        assert_eq!(app.status_text().map(|(_, level)| level), Some(StatusLevel::Warn));

        app.command.input = "chain dogecoin".into();
        app.apply_command();
        assert_eq!(app.status_text().map(|(_, level)| level), Some(StatusLevel::Error));
    }

    #[test]
    fn test_runtime_error_releases_submit() {
        let address = format!("0x{}", "d".repeat(40));
        let mut app = App::new(
            Session::new(QueryParams::new(Chain::Ethereum, address), Default::default()),
            "http://127.0.0.1:8080",
        );
        app.submit();
        assert!(!app.submit_enabled());
        assert!(app.take_sample_request().is_some());

        app.apply_runtime_error("Worker channel closed");
        assert!(app.submit_enabled());
        assert_eq!(app.results.section_count(), 0);
    }
}
