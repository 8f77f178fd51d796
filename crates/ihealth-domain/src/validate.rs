//! Registration field validation.

use chrono::NaiveDate;

use crate::role::Role;

/// Minimal email shape check: one `@`, a non-empty local part, and a domain
/// containing a dot, with no whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((head, tail)) => !head.is_empty() && !tail.is_empty(),
        None => false,
    }
}

/// Senegalese mobile number: 9 digits, `70`/`76`/`77`/`78` prefix.
pub fn is_valid_phone(phone: &str) -> bool {
    if phone.len() != 9 || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let mut bytes = phone.bytes();
    bytes.next() == Some(b'7') && matches!(bytes.next(), Some(b'0' | b'6' | b'7' | b'8'))
}

/// Parse a `YYYY-MM-DD` birthdate and reject dates after `today`.
pub fn parse_birthdate(birthdate: &str, today: NaiveDate) -> Result<NaiveDate, BirthdateError> {
    let date =
        NaiveDate::parse_from_str(birthdate, "%Y-%m-%d").map_err(|_| BirthdateError::Malformed)?;
    if date > today {
        return Err(BirthdateError::InFuture);
    }
    Ok(date)
}

#[derive(Debug, PartialEq, Eq)]
pub enum BirthdateError {
    Malformed,
    InFuture,
}

/// Invitation-code prefix convention per role.
pub fn invitation_prefix(role: Role) -> Option<&'static str> {
    match role {
        Role::Assistant => Some("ASST-"),
        Role::Doctor => Some("DR-"),
        Role::Patient | Role::Admin => None,
    }
}

/// An invitation code is accepted when it carries the role's prefix and is at
/// least 8 characters long.
pub fn is_valid_invitation_code(code: &str, role: Role) -> bool {
    match invitation_prefix(role) {
        Some(prefix) => code.starts_with(prefix) && code.len() >= 8,
        None => false,
    }
}
