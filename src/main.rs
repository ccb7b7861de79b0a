//! Wynn War Cooldown - territory war cooldown tracker
//!
//! A headless companion that reads game chat lines on stdin, tracks when
//! each territory becomes attackable again, and prints the timer HUD,
//! announcements and `/guild attack` commands on stdout.

mod chat;
mod commands;
mod common;
mod config;
mod engine;
mod host;
mod hud;
mod session;

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use futures::StreamExt;
use tokio::io::AsyncRead;
use tokio::signal;
use tokio::time::MissedTickBehavior;
use tokio_util::codec::FramedRead;
use tracing::{debug, error, info, warn};

use config::env::{apply_env_overrides, get_config_path, get_territories_path};
use config::load_or_init;
use engine::SystemClock;
use host::{
    ChatLineCodec, StaticTerritoryResolver, TerminalActionSink, TerminalNotificationSink,
};
use session::Session;

/// Interval between engine updates.
const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// Longest accepted input line.
const MAX_LINE_LENGTH: usize = 4096;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for the HUD
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Wynn War Cooldown v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_path = get_config_path();
    info!("Loading configuration from {}...", config_path);
    let config = apply_env_overrides(load_or_init(&config_path));

    info!("Configuration loaded");
    info!("  Tracking: {}", if config.is_mod_enabled { "enabled" } else { "disabled" });
    info!("  Timer offset: {}s", config.timer_offset_seconds);
    info!("  Guild attack at end: {}", config.send_guild_attack_at_end);
    info!("  Sound: {}", config.selected_sound.name());

    let territories_path = get_territories_path();
    let resolver = StaticTerritoryResolver::load(&territories_path, Box::new(SystemClock));
    if resolver.is_empty() {
        warn!(
            "No territories loaded from {}; names will not be resolved",
            territories_path
        );
    }

    let volume = config.sound_volume;
    let session = Session::new(
        config,
        Box::new(SystemClock),
        Box::new(resolver),
        Box::new(TerminalActionSink::stdout()),
        Box::new(TerminalNotificationSink::terminal(volume)),
    )
    .with_config_path(&config_path);

    info!("Reading chat from stdin (commands start with /wwc)");
    let stdin = tokio::io::stdin();
    let session = run_host(session, stdin, std::io::stdout(), shutdown_signal()).await?;

    // Timers are not persisted across runs
    let active = session.engine().get_active_territories();
    if !active.is_empty() {
        info!("Discarding {} active timers: {}", active.len(), active.join(", "));
    }

    info!("Exiting...");
    Ok(())
}

/// Drive a session from a line-oriented input until EOF or shutdown.
///
/// Command replies and HUD updates are written to `out`; the HUD is only
/// rewritten when its text changes.
async fn run_host<R, W, F>(
    mut session: Session,
    input: R,
    mut out: W,
    shutdown: F,
) -> Result<Session>
where
    R: AsyncRead + Unpin,
    W: Write,
    F: Future<Output = ()>,
{
    let mut lines = FramedRead::new(input, ChatLineCodec::new(MAX_LINE_LENGTH));
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut last_hud: Option<String> = None;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
            line = lines.next() => match line {
                Some(Ok(line)) => {
                    for reply in session.handle_line(&line) {
                        writeln!(out, "{}", reply)?;
                    }
                }
                Some(Err(e)) => {
                    error!("Failed to read input: {}", e);
                    break;
                }
                None => {
                    info!("Input closed");
                    break;
                }
            },
            _ = ticker.tick() => session.tick(),
        }

        let hud = session.render_hud().filter(|text| !text.is_empty());
        if hud != last_hud {
            if let Some(text) = &hud {
                writeln!(out, "{}", text)?;
            } else {
                debug!("HUD cleared");
            }
            last_hud = hud;
        }
        out.flush()?;
    }

    Ok(session)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::make_test_session;

    #[tokio::test]
    async fn test_run_host_routes_lines_until_eof() {
        let (session, _clock, _log) = make_test_session(None);
        let input = tokio_test::io::Builder::new()
            .read(b"/wwc list\n")
            .read(b"&c[ABC] has taken control of Detlas!\n")
            .read(b"/wwc remove Nowhere\n")
            .build();
        let mut out = Vec::new();

        let session = run_host(session, input, &mut out, std::future::pending())
            .await
            .unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("No active cooldowns"));
        assert!(printed.contains("Detlas 10:00"));
        assert!(printed.contains("No cooldown found for: Nowhere"));
        assert_eq!(session.engine().get_active_territories(), vec!["Detlas".to_string()]);
    }

    #[tokio::test]
    async fn test_run_host_survives_garbled_lines() {
        let (session, _clock, _log) = make_test_session(None);
        let input = tokio_test::io::Builder::new()
            .read(b"caf\xff junk\n")
            .read(b"[ABC] has taken control of Detlas!\n")
            .build();
        let mut out = Vec::new();

        let session = run_host(session, input, &mut out, std::future::pending())
            .await
            .unwrap();

        assert_eq!(session.engine().get_active_territories(), vec!["Detlas".to_string()]);
    }

    #[tokio::test]
    async fn test_run_host_stops_on_shutdown() {
        let (session, _clock, _log) = make_test_session(None);
        let input = tokio_test::io::Builder::new()
            .wait(Duration::from_secs(3600))
            .build();
        let mut out = Vec::new();

        let session = run_host(session, input, &mut out, async {}).await.unwrap();
        assert!(session.engine().get_active_territories().is_empty());
    }

    #[tokio::test]
    async fn test_run_host_hides_hud_when_toggled() {
        let (session, _clock, _log) = make_test_session(None);
        let input = tokio_test::io::Builder::new()
            .read(b"/wwc toggle\n")
            .read(b"[ABC] has taken control of Almuj!\n")
            .build();
        let mut out = Vec::new();

        run_host(session, input, &mut out, std::future::pending())
            .await
            .unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Timer HUD hidden"));
        assert!(!printed.contains("Almuj"));
    }
}
