//! Tiandao player - console composition root.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use reqwest::cookie::Jar;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tiandao_player::application::services::{ActionService, PreferencesService, SessionService};
use tiandao_player::infrastructure::platform::DesktopStorageProvider;
use tiandao_player::infrastructure::websocket::create_connection;
use tiandao_player::infrastructure::{ApiAdapter, EventBus, ProtocolDispatcher};
use tiandao_player::ports::outbound::SessionView;
use tiandao_player::state::{RollOverlay, SessionStore};
use tiandao_player::ui::{
    self, input::HELP, is_affirmative, Command, ConsoleRenderer, LoginPrompt, REFRESH_CONFIRMATION,
};
use tiandao_player::PlayerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Local overrides win over the shared .env
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tiandao_player=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = PlayerConfig::from_env().context("invalid configuration")?;
    tracing::info!(
        origin = %config.endpoints.origin(),
        reconnect_delay_ms = config.reconnect_delay.as_millis() as u64,
        "Starting Tiandao player"
    );

    let jar = Arc::new(Jar::default());
    let api = ApiAdapter::new(config.endpoints.clone(), Arc::clone(&jar), config.request_timeout)
        .context("failed to build HTTP client")?;

    let events = EventBus::new();
    let store = SessionStore::new();
    let overlay = RollOverlay::new(events.clone());
    let dispatcher = ProtocolDispatcher::new(store.clone(), overlay, events.clone());
    let connection = create_connection(
        &config.endpoints,
        Arc::clone(&jar),
        config.reconnect_delay,
        dispatcher,
        events.clone(),
    );
    let socket = Arc::new(connection.client.clone());

    let actions = ActionService::new(socket.clone(), store.clone(), events.clone());
    let session = SessionService::new(Arc::new(api), socket, store, events.clone());

    let prefs = PreferencesService::new(DesktopStorageProvider::open(&config.prefs_path));
    let collapsed = Arc::new(AtomicBool::new(prefs.status_panel_collapsed()));
    ui::attach(
        &events,
        ConsoleRenderer::new(Arc::clone(&collapsed)),
        std::io::stdout(),
    )
    .await;

    let mut view = session.initialize().await;
    if view == SessionView::Login {
        if let Some((username, password)) = &config.auto_login {
            view = session
                .login(username, password)
                .await
                .unwrap_or(SessionView::Login);
        }
    }

    let mut login = LoginPrompt::default();
    let mut confirming_refresh = false;
    show_prompt(view, &login);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if view == SessionView::Login {
            if let Some((username, password)) = login.feed(&line) {
                view = session
                    .login(&username, &password)
                    .await
                    .unwrap_or(SessionView::Login);
            }
            show_prompt(view, &login);
            continue;
        }

        if confirming_refresh {
            confirming_refresh = false;
            if is_affirmative(&line) {
                if let Err(e) = session.refresh_attempts().await {
                    if e.is_unauthorized() {
                        view = SessionView::Login;
                    }
                }
            }
            show_prompt(view, &login);
            continue;
        }

        match Command::parse(&line) {
            Command::Action(text) => {
                actions.set_draft(text).await;
                let outcome = actions.submit_draft().await;
                tracing::debug!(?outcome, "Draft submitted");
            }
            Command::Start => {
                let outcome = actions.start_trial().await;
                tracing::debug!(?outcome, "Start requested");
            }
            Command::Refresh => {
                confirming_refresh = true;
                println!("{REFRESH_CONFIRMATION}");
            }
            Command::Logout => view = session.logout().await,
            Command::ToggleStatus => {
                let now = prefs.toggle_status_panel();
                collapsed.store(now, Ordering::Relaxed);
                println!("{}", if now { "状态栏已折叠" } else { "状态栏已展开" });
            }
            Command::Help => println!("{HELP}"),
            Command::Unknown(raw) => println!("未知指令: {raw} (输入 /help 查看)"),
            Command::Quit => break,
        }
        show_prompt(view, &login);
    }

    tracing::info!("Tiandao player exiting");
    Ok(())
}

fn show_prompt(view: SessionView, login: &LoginPrompt) {
    if view == SessionView::Login {
        println!("{}", login.label());
    }
}
