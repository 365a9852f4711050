use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::ServerArgs;
use crate::args::parsers::{check_body_limit, check_dimension, parse_host};
use crate::charts::ChartTheme;
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::ConfigFile;

/// Fills every argument the user did not set explicitly from the config file.
///
/// # Errors
///
/// Returns an error when a config value is out of range.
pub fn apply_config(
    args: &mut ServerArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "host")
        && let Some(host) = config.host.as_deref()
    {
        args.host = parse_host(host).map_err(|err| out_of_range("host", err))?;
    }

    if !is_cli(matches, "port")
        && let Some(port) = config.port
    {
        args.port = port;
    }

    if !is_cli(matches, "width")
        && let Some(width) = config.width
    {
        args.width = check_dimension(width).map_err(|err| out_of_range("width", err))?;
    }

    if !is_cli(matches, "height")
        && let Some(height) = config.height
    {
        args.height = check_dimension(height).map_err(|err| out_of_range("height", err))?;
    }

    if !is_cli(matches, "max_body_bytes")
        && let Some(limit) = config.max_body_bytes
    {
        args.max_body_bytes =
            check_body_limit(limit).map_err(|err| out_of_range("max_body_bytes", err))?;
    }

    Ok(())
}

/// Builds the chart palette, applying any `[theme]` overrides.
///
/// # Errors
///
/// Returns an error when an override is not a recognised color.
pub fn chart_theme(config: Option<&ConfigFile>) -> AppResult<ChartTheme> {
    match config.and_then(|config| config.theme.as_ref()) {
        Some(overrides) => ChartTheme::with_overrides(overrides).map_err(AppError::from),
        None => Ok(ChartTheme::default()),
    }
}

/// Command-line and environment values win over the file.
fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn out_of_range(field: &'static str, source: ValidationError) -> AppError {
    AppError::config(ConfigError::OutOfRange { field, source })
}
