use crate::error::ValidationError;

use super::defaults::{MAX_DIMENSION, MIN_DIMENSION};

pub(crate) fn parse_host(s: &str) -> Result<String, ValidationError> {
    let host = s.trim();
    if host.is_empty() || host.contains(char::is_whitespace) || host.contains('/') {
        return Err(ValidationError::InvalidListenAddress {
            value: s.to_owned(),
        });
    }
    Ok(host.to_owned())
}

pub(super) fn parse_dimension(s: &str) -> Result<u32, ValidationError> {
    let value = s
        .trim()
        .parse::<u32>()
        .map_err(|err| ValidationError::InvalidNumber { source: err })?;
    check_dimension(value)
}

pub(super) fn parse_body_limit(s: &str) -> Result<usize, ValidationError> {
    let value = s
        .trim()
        .parse::<usize>()
        .map_err(|err| ValidationError::InvalidNumber { source: err })?;
    check_body_limit(value)
}

/// Canvas edges must fit labels and stay within a sane bitmap size.
pub(crate) const fn check_dimension(value: u32) -> Result<u32, ValidationError> {
    if value < MIN_DIMENSION {
        return Err(ValidationError::ValueTooSmall {
            min: MIN_DIMENSION as u64,
        });
    }
    if value > MAX_DIMENSION {
        return Err(ValidationError::ValueTooLarge {
            max: MAX_DIMENSION as u64,
        });
    }
    Ok(value)
}

pub(crate) const fn check_body_limit(value: usize) -> Result<usize, ValidationError> {
    if value == 0 {
        return Err(ValidationError::ValueTooSmall { min: 1 });
    }
    Ok(value)
}
