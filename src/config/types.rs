use serde::Deserialize;

use crate::charts::ThemeOverrides;

/// Settings accepted from `easychart.toml` / `easychart.json`.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub max_body_bytes: Option<usize>,
    pub theme: Option<ThemeOverrides>,
}
