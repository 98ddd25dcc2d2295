//! Input formatters — canonicalize what the user typed before storing it.

/// Digits only, capped at 10.
pub fn contact_number(value: &str) -> String {
  value.chars().filter(char::is_ascii_digit).take(10).collect()
}

/// Uppercase, alphanumerics only.
pub fn vehicle_number(value: &str) -> String {
  value
    .chars()
    .filter(char::is_ascii_alphanumeric)
    .map(|c| c.to_ascii_uppercase())
    .collect()
}

/// Digits and a decimal point only.
pub fn temperature(value: &str) -> String {
  value
    .chars()
    .filter(|c| c.is_ascii_digit() || *c == '.')
    .collect()
}
