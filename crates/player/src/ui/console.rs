//! Line-oriented console presenter.
//!
//! `ConsoleRenderer` turns player events into output lines and is pure
//! enough to test; `attach` wires it to the event bus and a writer.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use tiandao_shared::{LifeAttributes, SessionState};

use crate::application::dto::{ControlsView, HistoryLine};
use crate::infrastructure::messaging::EventBus;
use crate::ports::outbound::{
    ConnectionState, OverlayPhase, PlayerEvent, RollOverlayView, SessionView,
};

const INDENT: &str = "  ";

pub struct ConsoleRenderer {
    /// History lines already on screen
    rendered_history: Vec<String>,
    connection: ConnectionState,
    loading: bool,
    status_collapsed: Arc<AtomicBool>,
}

impl ConsoleRenderer {
    /// `status_collapsed` is shared with whoever toggles the status panel.
    pub fn new(status_collapsed: Arc<AtomicBool>) -> Self {
        Self {
            rendered_history: Vec::new(),
            connection: ConnectionState::Disconnected,
            loading: false,
            status_collapsed,
        }
    }

    pub fn render(&mut self, event: &PlayerEvent) -> Vec<String> {
        match event {
            PlayerEvent::StateReplaced(state) => self.render_state(state),
            PlayerEvent::RollOverlay(view) => render_overlay(view).into_iter().collect(),
            PlayerEvent::ConnectionChanged(state) => {
                let previous = std::mem::replace(&mut self.connection, *state);
                match state {
                    ConnectionState::Reconnecting if previous.is_open() => {
                        vec!["…… 与天道的联系中断，正在重连".to_string()]
                    }
                    ConnectionState::Open if previous == ConnectionState::Reconnecting => {
                        vec!["…… 已重新连接".to_string()]
                    }
                    _ => Vec::new(),
                }
            }
            PlayerEvent::Loading(loading) => {
                let started = *loading && !self.loading;
                self.loading = *loading;
                if started {
                    vec!["…… 加载中".to_string()]
                } else {
                    Vec::new()
                }
            }
            PlayerEvent::ViewChanged(SessionView::Login) => {
                self.rendered_history.clear();
                vec!["请登录：输入用户名与密码".to_string()]
            }
            PlayerEvent::ViewChanged(SessionView::Game) => Vec::new(),
            PlayerEvent::Notice(notice) => vec![format!("! {notice}")],
        }
    }

    fn render_state(&mut self, state: &SessionState) -> Vec<String> {
        let mut lines = Vec::new();

        // Anything but an append (new day, reset, rewritten line) reprints it all.
        if !state.display_history.starts_with(&self.rendered_history) {
            lines.push("────────".to_string());
            self.rendered_history.clear();
        }
        for raw in &state.display_history[self.rendered_history.len()..] {
            lines.push(match HistoryLine::classify(raw) {
                HistoryLine::UserInput(text) | HistoryLine::System(text) => text.to_string(),
                HistoryLine::Narrative(text) => format!("{INDENT}{text}"),
            });
        }
        self.rendered_history.clone_from(&state.display_history);

        if !self.status_collapsed.load(Ordering::Relaxed) {
            lines.extend(render_status(state.current_life.as_ref()));
        }
        lines.push(render_controls(state, self.connection));
        lines
    }
}

fn render_overlay(view: &RollOverlayView) -> Option<String> {
    let event = view.event.as_ref()?;
    match view.phase {
        OverlayPhase::Masked => Some(format!("【判定: {}】(<= {}) ……", event.kind, event.target)),
        OverlayPhase::Revealed => Some(format!(
            "【判定: {}】(<= {}) 掷出 {} → {}",
            event.kind, event.target, event.result, event.outcome
        )),
        OverlayPhase::Dismissed => None,
    }
}

fn render_controls(state: &SessionState, connection: ConnectionState) -> String {
    let controls = ControlsView::derive(Some(state), connection);
    let mut parts = vec![format!("机缘: {}", state.opportunities_remaining)];

    if let Some(button) = &controls.start_button {
        if button.enabled {
            parts.push(format!("/start {}", button.label));
        } else {
            parts.push(button.label.to_string());
        }
    }
    if controls.show_action_input {
        parts.push(if controls.action_input_enabled {
            "输入行动".to_string()
        } else {
            "天道推演中……".to_string()
        });
    }
    if controls.show_refresh_button {
        parts.push("/refresh 重新开始".to_string());
    }
    if controls.loading && !state.is_processing {
        parts.push("连接中……".to_string());
    }
    format!("[{}]", parts.join(" | "))
}

fn render_status(life: Option<&LifeAttributes>) -> Vec<String> {
    let Some(life) = life else {
        return vec!["静待天命...".to_string()];
    };

    let mut lines = Vec::new();
    for (key, value) in life {
        lines.push(format!("▸ {key}"));
        render_value(&mut lines, value, 1);
    }
    lines
}

fn render_value(lines: &mut Vec<String>, value: &Value, level: usize) {
    let pad = INDENT.repeat(level);
    match value {
        Value::Array(items) => {
            for item in items {
                render_value(lines, item, level);
            }
        }
        Value::Object(map) => {
            for (key, val) in map {
                match val {
                    Value::Array(_) | Value::Object(_) => {
                        lines.push(format!("{pad}{key}:"));
                        render_value(lines, val, level + 1);
                    }
                    scalar => lines.push(format!("{pad}{key}: {}", scalar_text(scalar))),
                }
            }
        }
        scalar => lines.push(format!("{pad}{}", scalar_text(scalar))),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Subscribe a renderer to the bus, writing each produced line to `out`.
pub async fn attach<W>(events: &EventBus, renderer: ConsoleRenderer, out: W)
where
    W: Write + Send + 'static,
{
    let renderer = Arc::new(Mutex::new(renderer));
    let out = Arc::new(Mutex::new(out));
    events
        .subscribe(move |event| {
            let lines = match renderer.lock() {
                Ok(mut renderer) => renderer.render(&event),
                Err(_) => return,
            };
            if lines.is_empty() {
                return;
            }
            if let Ok(mut out) = out.lock() {
                for line in lines {
                    if let Err(e) = writeln!(out, "{line}") {
                        tracing::warn!("Failed to write to console: {}", e);
                        return;
                    }
                }
                let _ = out.flush();
            }
        })
        .await;
}
