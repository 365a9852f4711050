use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use tracing::{debug, info};

use crate::args::ServerArgs;
use crate::charts::{ChartRenderer, ChartTheme};
use crate::config::{apply_config, chart_theme, load_config};
use crate::error::{AppError, AppResult, ValidationError};
use crate::server::{ChartService, bind_listener};
use crate::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};

/// Parses arguments, loads config and runs the server until a shutdown signal.
///
/// # Errors
///
/// Returns an error when arguments or config are invalid, the runtime cannot
/// be built, or the listen address cannot be bound.
pub fn run() -> AppResult<()> {
    let matches = ServerArgs::command().get_matches();
    let mut args = ServerArgs::from_arg_matches(&matches)?;

    let config = load_config(args.config.as_deref())?;
    if let Some(config) = config.as_ref() {
        apply_config(&mut args, &matches, config)?;
    }
    let theme = chart_theme(config.as_ref())?;

    crate::logger::init_logging(args.verbose, args.no_color);
    if config.is_some() {
        debug!("Loaded config file");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(ValidationError::RuntimeBuildFailed { source: err }))?;

    runtime.block_on(run_server(args, theme))
}

async fn run_server(args: ServerArgs, theme: ChartTheme) -> AppResult<()> {
    let listener = bind_listener(&args.host, args.port).await?;
    let renderer = ChartRenderer::new(theme, args.width, args.height);
    info!(
        "Rendering {}x{} charts, request bodies up to {} bytes",
        args.width, args.height, args.max_body_bytes
    );
    let service = Arc::new(ChartService::new(renderer, args.max_body_bytes));

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let result = service.serve(listener, shutdown_rx).await;

    drop(shutdown_tx.send(()));
    signal_handle
        .await
        .map_err(|err| AppError::validation(ValidationError::ShutdownJoinFailed { source: err }))?;
    result
}
