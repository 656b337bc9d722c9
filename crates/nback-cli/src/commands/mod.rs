pub mod play;
pub mod truth;

/// Parse a gesture key argument: exactly one character.
pub fn parse_key(s: &str) -> Result<char, String> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("expected a single character, got '{s}'")),
    }
}
