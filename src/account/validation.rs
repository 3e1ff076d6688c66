//! Input validation for account registration
//!
//! Fields are private to force validation through `new()`.

use super::error::AccountError;

/// Longest account holder name (`accounts_tb.name`)
pub const MAX_NAME_LEN: usize = 100;

/// Validated, trimmed account holder name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolderName(String);

impl HolderName {
    pub fn new(name: &str) -> Result<Self, AccountError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AccountError::InvalidValue("name is required".to_string()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(AccountError::InvalidValue(format!(
                "name must have at most {} characters",
                MAX_NAME_LEN
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// National identity document (CPF), stored as its 11 digits
///
/// Punctuation is ignored. The two trailing check digits must match the
/// mod-11 weighted sums, and a single repeated digit is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document(String);

impl Document {
    pub fn new(raw: &str) -> Result<Self, AccountError> {
        let digits: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();
        if digits.len() != 11 || digits.iter().all(|d| *d == digits[0]) {
            return Err(AccountError::InvalidDocument);
        }
        if digits[9] != check_digit(&digits[..9]) || digits[10] != check_digit(&digits[..10]) {
            return Err(AccountError::InvalidDocument);
        }
        Ok(Self(digits.iter().map(|d| char::from(b'0' + *d as u8)).collect()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check digit over `prefix` with weights `len + 1` down to 2
fn check_digit(prefix: &[u32]) -> u32 {
    let weight = prefix.len() as u32 + 1;
    let sum: u32 = prefix
        .iter()
        .enumerate()
        .map(|(i, d)| d * (weight - i as u32))
        .sum();
    match sum % 11 {
        0 | 1 => 0,
        rem => 11 - rem,
    }
}
