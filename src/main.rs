#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;
use std::time::Duration;

use anyhow::Error;
use anyhow::Result;
use domain::models::Action;
use domain::services::ConnectionManager;
use domain::services::SessionController;
use domain::services::SessionOptions;
use infrastructure::hosts::StandaloneHost;
use infrastructure::sessions_api::HttpSessionsApi;
use infrastructure::transports::SocketIo;
use tokio::sync::mpsc;
use tokio::task;
use yansi::Paint;

use crate::application::cli;
use crate::application::ui;
use crate::configuration::Config;
use crate::configuration::ConfigKey;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        Paint::red(format!(
            "Oh no! widgetchat has failed with the following app version and error.\n\nVersion: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            err
        ))
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

fn session_options() -> SessionOptions {
    return SessionOptions {
        greeting: Config::get(ConfigKey::Greeting),
        quick_replies: Config::quick_replies(),
        assistant_id: Config::get(ConfigKey::AssistantId),
        typing_timeout: Duration::from_millis(Config::get_u64(ConfigKey::TypingTimeout)),
        host_origin: Config::get(ConfigKey::HostOrigin),
        mobile_breakpoint: u32::try_from(Config::get_u64(ConfigKey::MobileBreakpoint))
            .unwrap_or(u32::MAX),
    };
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

async fn run() -> Result<()> {
    let connection = ConnectionManager::new(
        Box::<SocketIo>::default(),
        Box::<HttpSessionsApi>::default(),
    );
    let controller = SessionController::new(
        connection,
        Box::<StandaloneHost>::default(),
        session_options(),
    );
    let snapshots = controller.subscribe();

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let mut background_futures = task::JoinSet::new();
    background_futures.spawn(async move {
        return controller.run(&mut action_rx, shutdown_signal()).await;
    });

    let ui_res = ui::start(action_tx, snapshots).await;

    // The controller sees the closed action channel, tears the session down
    // and exits.
    while let Some(res) = background_futures.join_next().await {
        res??;
    }

    return ui_res;
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        ui::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let log_path = cli::log_path();
    let debug_log_dir = log_path
        .parent()
        .map(|dir| return dir.to_path_buf())
        .unwrap_or_else(env::temp_dir);

    let file_appender = tracing_appender::rolling::never(debug_log_dir, "debug.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("widgetchat")
    {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    match cli::parse().await {
        Ok(true) => {}
        Ok(false) => {
            process::exit(0);
        }
        Err(err) => {
            handle_error(err);
            return;
        }
    }

    if let Err(err) = run().await {
        ui::destruct_terminal_for_panic();
        handle_error(err);
    }

    process::exit(0);
}
