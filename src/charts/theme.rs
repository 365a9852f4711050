use plotters::style::RGBColor;
use serde::Deserialize;

use crate::error::{ConfigError, ValidationError};

use super::color::parse_color;

/// Fixed dark palette shared by every chart.
///
/// Built once at startup and only ever read afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartTheme {
    pub background: RGBColor,
    pub plot_background: RGBColor,
    pub foreground: RGBColor,
    pub grid: RGBColor,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background: RGBColor(0x2B, 0x2D, 0x31),
            plot_background: RGBColor(0x31, 0x33, 0x38),
            foreground: RGBColor(0xE0, 0xE0, 0xE0),
            grid: RGBColor(0x4F, 0x4F, 0x4F),
        }
    }
}

/// Optional per-field overrides, as read from the config file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct ThemeOverrides {
    pub background: Option<String>,
    pub plot_background: Option<String>,
    pub foreground: Option<String>,
    pub grid: Option<String>,
}

impl ChartTheme {
    /// Applies config overrides on top of the default palette.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first field whose color cannot be parsed.
    pub fn with_overrides(overrides: &ThemeOverrides) -> Result<Self, ConfigError> {
        let mut theme = Self::default();
        apply(&mut theme.background, overrides.background.as_deref(), "background")?;
        apply(
            &mut theme.plot_background,
            overrides.plot_background.as_deref(),
            "plot_background",
        )?;
        apply(&mut theme.foreground, overrides.foreground.as_deref(), "foreground")?;
        apply(&mut theme.grid, overrides.grid.as_deref(), "grid")?;
        Ok(theme)
    }
}

fn apply(
    slot: &mut RGBColor,
    value: Option<&str>,
    field: &'static str,
) -> Result<(), ConfigError> {
    if let Some(value) = value {
        *slot = parse_color(value).map_err(|source: ValidationError| {
            ConfigError::InvalidThemeColor { field, source }
        })?;
    }
    Ok(())
}
