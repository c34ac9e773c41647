//! `networktapd`: binary entrypoint (spec §6, §4.10).

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tap_daemon::cli::Cli;
use tap_daemon::{env, logging, Runtime};
use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::sync::Notify;
use tracing::{error, info};

#[derive(Debug, Clone, Copy)]
enum ShutdownReason {
    Terminate,
    Interrupt,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_guard = logging::setup_logging(&cli.log_level);

    let config_path = env::resolve_config_path(cli.config.clone());
    info!(path = %config_path.display(), "resolving configuration");

    let runtime = match Runtime::start(config_path).await {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "configuration error, exiting");
            return ExitCode::from(1);
        }
    };

    let configured_port = runtime.api_state.config.get().web.port;
    let bind_addr = match resolve_bind_addr(cli.bind.as_deref(), configured_port) {
        Ok(addr) => addr,
        Err(e) => {
            error!(error = %e, "invalid --bind address, exiting");
            runtime.shutdown().await;
            return ExitCode::from(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, bind = %bind_addr, "failed to bind HTTP listener");
            runtime.shutdown().await;
            return ExitCode::from(2);
        }
    };

    let (mut sigterm, mut sigint) = match install_signal_handlers() {
        Ok(handlers) => handlers,
        Err(e) => {
            error!(error = %e, "failed to install signal handlers");
            runtime.shutdown().await;
            return ExitCode::from(2);
        }
    };

    let router = tap_api::build_router(runtime.api_state.clone());
    let shutdown_notify = Arc::new(Notify::new());
    let server_notify = shutdown_notify.clone();
    let server_task = tokio::spawn(async move {
        axum::serve(listener, router).with_graceful_shutdown(async move { server_notify.notified().await }).await
    });

    info!(bind = %bind_addr, "networktapd ready");

    let reason = wait_for_shutdown_signal(&mut sigterm, &mut sigint).await;
    match reason {
        ShutdownReason::Terminate => info!("received SIGTERM, shutting down"),
        ShutdownReason::Interrupt => info!("received SIGINT, shutting down"),
    }
    shutdown_notify.notify_one();

    let server_result = server_task.await;
    runtime.shutdown().await;

    match server_result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            error!(error = %e, "http server exited with an error");
            return ExitCode::from(2);
        }
        Err(e) => {
            error!(error = %e, "http server task panicked");
            return ExitCode::from(2);
        }
    }

    match reason {
        ShutdownReason::Terminate => ExitCode::SUCCESS,
        ShutdownReason::Interrupt => ExitCode::from(130),
    }
}

fn install_signal_handlers() -> std::io::Result<(Signal, Signal)> {
    Ok((signal(SignalKind::terminate())?, signal(SignalKind::interrupt())?))
}

async fn wait_for_shutdown_signal(sigterm: &mut Signal, sigint: &mut Signal) -> ShutdownReason {
    tokio::select! {
        _ = sigterm.recv() => ShutdownReason::Terminate,
        _ = sigint.recv() => ShutdownReason::Interrupt,
    }
}

/// `--bind host:port` overrides the listen address entirely; otherwise bind
/// every interface on the config file's `WEB_PORT`.
fn resolve_bind_addr(flag: Option<&str>, configured_port: u16) -> Result<SocketAddr, std::net::AddrParseError> {
    match flag {
        Some(raw) => raw.parse(),
        None => Ok(SocketAddr::from(([0, 0, 0, 0], configured_port))),
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
