use regex::Regex;

pub const USERNAME_REQUIRED: &str = "username is required";
pub const USERNAME_FORMAT: &str =
    "username must be 3-20 characters, alphanumeric and underscores only";
pub const EMAIL_REQUIRED: &str = "email is required";
pub const EMAIL_FORMAT: &str = "invalid email format";
pub const USERNAME_TAKEN: &str = "username already exists";

/// Username rule: 3-20 characters, alphanumeric and underscores only.
pub fn username_format_valid(username: &str) -> bool {
    Regex::new(r"^[A-Za-z0-9_]{3,20}$")
        .expect("valid regex")
        .is_match(username)
}

/// Email rule: local@domain with a dot-separated suffix label of length >= 2.
pub fn email_format_valid(email: &str) -> bool {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("valid regex")
        .is_match(email)
}

/// Apply the static username/email rules independently, reporting every
/// violated rule rather than stopping at the first. The uniqueness check is
/// not part of this: it needs the store and is only reached when the static
/// rules all pass.
pub fn static_user_errors(username: Option<&str>, email: Option<&str>) -> Vec<String> {
    let mut errors = Vec::new();

    match username {
        None | Some("") => errors.push(USERNAME_REQUIRED.to_string()),
        Some(u) if !username_format_valid(u) => errors.push(USERNAME_FORMAT.to_string()),
        _ => {}
    }

    match email {
        None | Some("") => errors.push(EMAIL_REQUIRED.to_string()),
        Some(e) if !email_format_valid(e) => errors.push(EMAIL_FORMAT.to_string()),
        _ => {}
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- username format ---

    #[test]
    fn username_accepts_alphanumeric_and_underscore() {
        assert!(username_format_valid("alice_01"));
        assert!(username_format_valid("Bob"));
        assert!(username_format_valid("a_b_c_d_e_f_g_h_i_j"));
    }

    #[test]
    fn username_rejects_too_short() {
        assert!(!username_format_valid("ab"));
    }

    #[test]
    fn username_rejects_too_long() {
        assert!(!username_format_valid("a".repeat(21).as_str()));
    }

    #[test]
    fn username_accepts_boundary_lengths() {
        assert!(username_format_valid("abc"));
        assert!(username_format_valid("a".repeat(20).as_str()));
    }

    #[test]
    fn username_rejects_special_characters() {
        assert!(!username_format_valid("alice!"));
        assert!(!username_format_valid("al ice"));
        assert!(!username_format_valid("alice@home"));
    }

    // --- email format ---

    #[test]
    fn email_accepts_standard_addresses() {
        assert!(email_format_valid("x@y.com"));
        assert!(email_format_valid("first.last+tag@sub.example.co"));
    }

    #[test]
    fn email_rejects_missing_at_or_tld() {
        assert!(!email_format_valid("not-an-email"));
        assert!(!email_format_valid("x@y"));
        assert!(!email_format_valid("x@y.c"));
    }

    // --- static_user_errors ---

    #[test]
    fn all_violations_reported_independently() {
        let errors = static_user_errors(Some("ab"), Some("bad"));
        assert_eq!(errors, vec![USERNAME_FORMAT.to_string(), EMAIL_FORMAT.to_string()]);
    }

    #[test]
    fn missing_fields_reported_as_required() {
        let errors = static_user_errors(None, None);
        assert_eq!(errors, vec![USERNAME_REQUIRED.to_string(), EMAIL_REQUIRED.to_string()]);
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let errors = static_user_errors(Some(""), Some(""));
        assert_eq!(errors, vec![USERNAME_REQUIRED.to_string(), EMAIL_REQUIRED.to_string()]);
    }

    #[test]
    fn well_formed_input_yields_no_errors() {
        assert!(static_user_errors(Some("alice_01"), Some("alice@example.com")).is_empty());
    }
}
