//! Signed-in user's own account: contact details, rename, deletion.

pub(crate) mod page;

use axum::{Router, routing::post};

use crate::{AppState, appresult::UserError};

pub const MAX_ADDRESS_CHARS: usize = 200;
pub const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 7..=15;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", post(page::update))
        .route("/profile/delete", post(page::delete))
}

pub fn check_phone(phone: &str) -> Result<&str, UserError> {
    let phone = phone.trim();
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'));
    let digits = phone.chars().filter(char::is_ascii_digit).count();

    if !allowed || !PHONE_DIGITS.contains(&digits) {
        return Err(UserError::validation(format!(
            "Please enter a valid phone number ({} to {} digits).",
            PHONE_DIGITS.start(),
            PHONE_DIGITS.end()
        )));
    }
    Ok(phone)
}

pub fn check_address(address: &str) -> Result<&str, UserError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(UserError::validation("Please enter an address."));
    }
    if address.chars().count() > MAX_ADDRESS_CHARS {
        return Err(UserError::validation(format!(
            "Addresses are limited to {MAX_ADDRESS_CHARS} characters."
        )));
    }
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_numbers() {
        assert_eq!(check_phone(" +60 (12) 345-6789 "), Ok("+60 (12) 345-6789"));
        assert!(check_phone("1234567").is_ok());
        assert!(check_phone("123456").is_err());
        assert!(check_phone("1234567890123456").is_err());
        assert!(check_phone("555-CALL-NOW").is_err());
        assert!(check_phone("").is_err());
    }

    #[test]
    fn addresses() {
        assert_eq!(check_address("  1 Jalan Ampang "), Ok("1 Jalan Ampang"));
        assert!(check_address("   ").is_err());
        assert!(check_address(&"x".repeat(MAX_ADDRESS_CHARS)).is_ok());
        assert!(check_address(&"x".repeat(MAX_ADDRESS_CHARS + 1)).is_err());
    }
}
