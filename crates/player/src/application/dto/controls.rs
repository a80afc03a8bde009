//! Control visibility derived from the session snapshot.

use tiandao_shared::SessionState;

use crate::ports::outbound::ConnectionState;

/// Opportunities granted at the start of a day
const FULL_OPPORTUNITIES: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartButton {
    pub label: &'static str,
    pub enabled: bool,
}

/// What the presenter should show, recomputed on every state or connection change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsView {
    pub loading: bool,
    pub show_action_input: bool,
    pub action_input_enabled: bool,
    pub start_button: Option<StartButton>,
    pub show_refresh_button: bool,
}

impl ControlsView {
    pub fn derive(state: Option<&SessionState>, connection: ConnectionState) -> Self {
        let Some(state) = state else {
            return Self {
                loading: true,
                show_action_input: false,
                action_input_enabled: false,
                start_button: None,
                show_refresh_button: false,
            };
        };

        let show_action_input = state.is_in_trial
            || state.daily_success_achieved
            || state.opportunities_remaining < 0;

        let start_button = (!show_action_input).then(|| start_button(state));

        Self {
            loading: state.is_processing || !connection.is_open(),
            show_action_input,
            action_input_enabled: !state.is_processing,
            start_button,
            show_refresh_button: state.daily_success_achieved,
        }
    }
}

fn start_button(state: &SessionState) -> StartButton {
    if state.daily_success_achieved {
        StartButton {
            label: "今日功德圆满",
            enabled: false,
        }
    } else if state.opportunities_remaining <= 0 {
        StartButton {
            label: "机缘已尽",
            enabled: false,
        }
    } else {
        let label = if state.opportunities_remaining == FULL_OPPORTUNITIES {
            "开始第一次试炼"
        } else {
            "开启下一次试炼"
        };
        StartButton {
            label,
            enabled: !state.is_processing,
        }
    }
}

/// One line of the display history, classified for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryLine<'a> {
    /// Echo of the player's own input (`"> "` prefix)
    UserInput(&'a str),
    /// System announcement (`"【"` prefix)
    System(&'a str),
    Narrative(&'a str),
}

impl<'a> HistoryLine<'a> {
    pub fn classify(line: &'a str) -> Self {
        if line.starts_with("> ") {
            HistoryLine::UserInput(line)
        } else if line.starts_with('【') {
            HistoryLine::System(line)
        } else {
            HistoryLine::Narrative(line)
        }
    }

    #[cfg(test)]
    pub fn text(&self) -> &'a str {
        match self {
            HistoryLine::UserInput(text) | HistoryLine::System(text) | HistoryLine::Narrative(text) => text,
        }
    }
}
