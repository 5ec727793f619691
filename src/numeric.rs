//! Parsing for inline numeric edits

/// Parse a user-typed number, clamping it to `floor`.
///
/// Malformed or non-finite input yields `previous`, so a bad edit simply
/// leaves the field as it was.
pub fn parse_clamped(input: &str, floor: f64, previous: f64) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value.max(floor),
        _ => previous,
    }
}

/// Same as [`parse_clamped`] for whole-number fields such as reps.
pub fn parse_clamped_count(input: &str, floor: u32, previous: u32) -> u32 {
    let value = parse_clamped(input, f64::from(floor), f64::from(previous)).round();
    if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_valid_number() {
        assert_eq!(parse_clamped("62.5", 0.0, 60.0), 62.5);
        assert_eq!(parse_clamped("  12 ", 0.0, 3.0), 12.0);
    }

    #[test]
    fn test_clamps_below_floor() {
        assert_eq!(parse_clamped("-5", 0.0, 10.0), 0.0);
        assert_eq!(parse_clamped_count("-3", 0, 8), 0);
    }

    #[test]
    fn test_falls_back_on_garbage() {
        assert_eq!(parse_clamped("abc", 0.0, 42.0), 42.0);
        assert_eq!(parse_clamped("", 0.0, 42.0), 42.0);
        assert_eq!(parse_clamped("NaN", 0.0, 42.0), 42.0);
        assert_eq!(parse_clamped("inf", 0.0, 42.0), 42.0);
        assert_eq!(parse_clamped_count("ten", 0, 7), 7);
    }

    #[test]
    fn test_count_rounds_fractions() {
        assert_eq!(parse_clamped_count("7.6", 0, 1), 8);
        assert_eq!(parse_clamped_count("7.4", 0, 1), 7);
    }
}
