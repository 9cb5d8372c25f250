use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;

use anyhow::Context;
use monitor_app::{load_settings, render, Controller, SETTINGS_FILENAME};
use monitor_core::Msg;
use monitor_logging::{monitor_info, monitor_warn};
use tokio::sync::mpsc::{self, UnboundedSender};

use super::logging::{self, LogDestination};

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize(LogDestination::Both, logging::level_from_env());

    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            monitor_warn!("Ignoring unreadable .env file: {}", err);
        }
    }

    let settings_path = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(SETTINGS_FILENAME);
    let settings = load_settings(Some(&settings_path), |name| std::env::var(name).ok())
        .context("loading monitor settings")?;
    monitor_info!("Starting uptime monitor with {:?}", settings.engine);

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(async move {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        spawn_stdin_reader(msg_tx);

        let controller = Controller::new(settings);
        controller
            .run(msg_rx, |view| {
                let mut out = io::stdout().lock();
                for line in render::render(view) {
                    let _ = writeln!(out, "{line}");
                }
                let _ = out.flush();
            })
            .await;
    });

    monitor_info!("Uptime monitor stopped");
    Ok(())
}

/// Each line of stdin is one form submission: `<url> <email>`.
/// `quit` or end of input closes the inbox.
fn spawn_stdin_reader(msg_tx: UnboundedSender<Msg>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("quit") {
                break;
            }
            let (url, email) = split_submission(line);
            let sent = [
                Msg::UrlInputChanged(url.to_string()),
                Msg::EmailInputChanged(email.to_string()),
                Msg::SubmitClicked,
            ]
            .into_iter()
            .all(|msg| msg_tx.send(msg).is_ok());
            if !sent {
                break;
            }
        }
    });
}

fn split_submission(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((url, email)) => (url, email.trim()),
        None => (line, ""),
    }
}
