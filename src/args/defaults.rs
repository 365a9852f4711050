pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5301;
/// 8 x 4.5 inches at 100 dpi.
pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 450;
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Smallest canvas edge that still leaves room for axes and labels.
pub(crate) const MIN_DIMENSION: u32 = 64;
pub(crate) const MAX_DIMENSION: u32 = 8192;
