//! Results panel - renders the last fetch outcome as collapsible sections

use crossterm::event::{KeyCode, KeyEvent};

use crate::core::{Action, Module, NotifyLevel, Session};
use crate::domain::render::{render_records, ResultView, Section};
use crate::domain::FetchOutcome;

#[derive(Debug, Clone)]
pub struct SectionState {
    pub section: Section,
    pub expanded: bool,
}

/// What the panel is currently showing
#[derive(Debug, Clone)]
pub enum ResultState {
    /// Nothing submitted yet
    Idle,
    Loading,
    /// Successful call, zero records
    Empty,
    Sections(Vec<SectionState>),
    /// Backend answered with `error_message`
    Warning(String),
    /// Timeout, connection or HTTP failure
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ResultsPanel {
    state: ResultState,
    selected: usize,
}

impl Default for ResultsPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsPanel {
    pub fn new() -> Self {
        Self {
            state: ResultState::Idle,
            selected: 0,
        }
    }

    pub fn state(&self) -> &ResultState {
        &self.state
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn show_loading(&mut self) {
        self.state = ResultState::Loading;
        self.selected = 0;
    }

    pub fn clear(&mut self) {
        self.state = ResultState::Idle;
        self.selected = 0;
    }

    pub fn show_outcome(&mut self, outcome: &FetchOutcome) {
        self.selected = 0;
        self.state = match outcome {
            FetchOutcome::Records(records) => match render_records(records) {
                ResultView::Empty => ResultState::Empty,
                ResultView::Sections(sections) => ResultState::Sections(
                    sections
                        .into_iter()
                        .map(|section| SectionState {
                            section,
                            expanded: false,
                        })
                        .collect(),
                ),
            },
            FetchOutcome::SoftError(message) => ResultState::Warning(message.clone()),
            FetchOutcome::Transport(err) => ResultState::Failed(err.to_string()),
        };
    }

    pub fn sections(&self) -> &[SectionState] {
        match &self.state {
            ResultState::Sections(sections) => sections,
            _ => &[],
        }
    }

    fn sections_mut(&mut self) -> &mut [SectionState] {
        match &mut self.state {
            ResultState::Sections(sections) => sections,
            _ => &mut [],
        }
    }

    pub fn section_count(&self) -> usize {
        self.sections().len()
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let len = self.section_count();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn toggle_selected(&mut self) {
        let selected = self.selected;
        if let Some(state) = self.sections_mut().get_mut(selected) {
            state.expanded = !state.expanded;
        }
    }

    pub fn set_all_expanded(&mut self, expanded: bool) {
        for state in self.sections_mut() {
            state.expanded = expanded;
        }
    }

    pub fn selected_tx_hash(&self) -> Option<&str> {
        self.sections()
            .get(self.selected)
            .and_then(|state| state.section.tx_hash.as_deref())
    }

    /// Line offset of the selected section header within the rendered panel
    pub fn selected_line_offset(&self) -> usize {
        self.sections()
            .iter()
            .take(self.selected)
            .map(|state| {
                1 + if state.expanded {
                    state.section.body.lines.len()
                } else {
                    0
                }
            })
            .sum()
    }
}

impl Module for ResultsPanel {
    fn handle_key(&mut self, key: KeyEvent, _session: &mut Session) -> Action {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_up();
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_down();
                Action::None
            }
            KeyCode::Home => {
                self.selected = 0;
                Action::None
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.section_count().saturating_sub(1);
                Action::None
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.toggle_selected();
                Action::None
            }
            KeyCode::Char('e') => {
                self.set_all_expanded(true);
                Action::None
            }
            KeyCode::Char('c') => {
                self.set_all_expanded(false);
                Action::None
            }
            KeyCode::Char('y') => match self.selected_tx_hash() {
                Some(hash) => Action::Copy(hash.to_string()),
                None => Action::Notify("Nothing to copy".into(), NotifyLevel::Warn),
            },
            KeyCode::Char('x') => Action::Export(None),
            _ => Action::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionRecord;
    use crate::error::TransportError;
    use crossterm::event::KeyModifiers;
    use serde_json::json;
    use std::time::Duration;

    fn records(values: serde_json::Value) -> Vec<TransactionRecord> {
        serde_json::from_value(values).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_empty_records_show_notice() {
        let mut panel = ResultsPanel::new();
        panel.show_outcome(&FetchOutcome::Records(vec![]));
        assert!(matches!(panel.state(), ResultState::Empty));
        assert_eq!(panel.section_count(), 0);
    }

    #[test]
    fn test_errors_have_distinct_states_and_no_sections() {
        let mut panel = ResultsPanel::new();
        panel.show_outcome(&FetchOutcome::SoftError("chain not supported".into()));
        assert!(matches!(panel.state(), ResultState::Warning(msg) if msg == "chain not supported"));
        assert_eq!(panel.section_count(), 0);

        panel.show_outcome(&FetchOutcome::Transport(TransportError::Timeout(
            Duration::from_secs(60),
        )));
        assert!(matches!(panel.state(), ResultState::Failed(msg) if msg.contains("timed out")));
        assert_eq!(panel.section_count(), 0);
    }

    #[test]
    fn test_navigation_and_toggle() {
        let mut panel = ResultsPanel::new();
        panel.show_outcome(&FetchOutcome::Records(records(json!([
            { "tx_hash": "0xaaa", "block": 1 },
            { "tx_hash": "0xbbb", "block": 2, "nonce": 3 }
        ]))));
        let mut session = Session::default();

        assert_eq!(panel.section_count(), 2);
        assert!(panel.sections().iter().all(|s| !s.expanded));

        panel.handle_key(key(KeyCode::Enter), &mut session);
        assert!(panel.sections()[0].expanded);
        panel.handle_key(key(KeyCode::Char('j')), &mut session);
        panel.handle_key(key(KeyCode::Char('j')), &mut session);
        assert_eq!(panel.selected(), 1);
        assert_eq!(panel.selected_line_offset(), 1 + 2);

        assert_eq!(
            panel.handle_key(key(KeyCode::Char('y')), &mut session),
            Action::Copy("0xbbb".into())
        );

        panel.handle_key(key(KeyCode::Char('e')), &mut session);
        assert!(panel.sections().iter().all(|s| s.expanded));
        panel.handle_key(key(KeyCode::Char('c')), &mut session);
        assert!(panel.sections().iter().all(|s| !s.expanded));
    }

    #[test]
    fn test_copy_without_hash_warns() {
        let mut panel = ResultsPanel::new();
        panel.show_outcome(&FetchOutcome::Records(records(json!([{ "block": 1 }]))));
        let action = panel.handle_key(key(KeyCode::Char('y')), &mut Session::default());
        assert!(matches!(action, Action::Notify(_, NotifyLevel::Warn)));
    }
}
