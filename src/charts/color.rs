use plotters::style::RGBColor;

use crate::error::ValidationError;

/// Parses a user-supplied color.
///
/// Accepts `#RRGGBB`, the single-letter codes `b g r c m y k w` (with the
/// same RGB values matplotlib uses for them) and a handful of basic names.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidColor`] when the value is not recognised.
pub fn parse_color(value: &str) -> Result<RGBColor, ValidationError> {
    let trimmed = value.trim();
    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| invalid(value));
    }

    let color = match trimmed.to_ascii_lowercase().as_str() {
        "b" | "blue" => RGBColor(0, 0, 255),
        "g" => RGBColor(0, 128, 0),
        "green" => RGBColor(0, 128, 0),
        "r" | "red" => RGBColor(255, 0, 0),
        "c" => RGBColor(0, 191, 191),
        "cyan" => RGBColor(0, 255, 255),
        "m" => RGBColor(191, 0, 191),
        "magenta" => RGBColor(255, 0, 255),
        "y" => RGBColor(191, 191, 0),
        "yellow" => RGBColor(255, 255, 0),
        "k" | "black" => RGBColor(0, 0, 0),
        "w" | "white" => RGBColor(255, 255, 255),
        "orange" => RGBColor(255, 165, 0),
        "purple" => RGBColor(128, 0, 128),
        "gray" | "grey" => RGBColor(128, 128, 128),
        _ => return Err(invalid(value)),
    };
    Ok(color)
}

fn parse_hex(hex: &str) -> Option<RGBColor> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
    };
    Some(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn invalid(value: &str) -> ValidationError {
    ValidationError::InvalidColor {
        value: value.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_color;
    use plotters::style::RGBColor;

    #[test]
    fn single_letter_codes_match_reference_palette() -> Result<(), String> {
        let cases = [
            ("m", RGBColor(191, 0, 191)),
            ("r", RGBColor(255, 0, 0)),
            ("g", RGBColor(0, 128, 0)),
            ("k", RGBColor(0, 0, 0)),
        ];
        for (code, expected) in cases {
            let parsed = parse_color(code).map_err(|err| err.to_string())?;
            if parsed != expected {
                return Err(format!("Unexpected color for '{}': {:?}", code, parsed));
            }
        }
        Ok(())
    }

    #[test]
    fn hex_colors_are_case_insensitive() -> Result<(), String> {
        let lower = parse_color("#2b2d31").map_err(|err| err.to_string())?;
        let upper = parse_color("#2B2D31").map_err(|err| err.to_string())?;
        if lower != upper || lower != RGBColor(0x2B, 0x2D, 0x31) {
            return Err(format!("Unexpected hex parse: {:?} / {:?}", lower, upper));
        }
        Ok(())
    }

    #[test]
    fn unknown_and_malformed_colors_are_rejected() -> Result<(), String> {
        for value in ["", "mauve", "#12345", "#GGGGGG", "#1234567", "#ééé"] {
            if parse_color(value).is_ok() {
                return Err(format!("Expected '{}' to be rejected", value));
            }
        }
        Ok(())
    }
}
