pub const COUNTRY_CODE: &str = "90";
pub const KEY_LEN: usize = 10;

/// Reduces `+905551234567`, `05551234567` or `(555) 123 45 67` to the
/// 10-digit key `5551234567`.
pub fn normalize(raw: &str) -> String {
    let mut digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() > KEY_LEN + 1 && digits.starts_with(COUNTRY_CODE) {
        digits.drain(..COUNTRY_CODE.len());
    }
    // Trunk zero, also when written after the country code.
    if digits.len() == KEY_LEN + 1 && digits.starts_with('0') {
        digits.remove(0);
    }
    digits
}

pub fn is_valid(raw: &str) -> bool {
    normalize(raw).len() == KEY_LEN
}

pub fn same_number(a: &str, b: &str) -> bool {
    let a = normalize(a);
    !a.is_empty() && a == normalize(b)
}

/// Canonical stored form, `+90` followed by the key.
pub fn to_e164(raw: &str) -> Option<String> {
    let key = normalize(raw);
    (key.len() == KEY_LEN).then(|| format!("+{COUNTRY_CODE}{key}"))
}

/// `+90 (555) 123 45 67`. Numbers that do not normalize to a key are returned unchanged.
pub fn format_display(raw: &str) -> String {
    let key = normalize(raw);
    if key.len() != KEY_LEN {
        return raw.to_string();
    }
    format!(
        "+{COUNTRY_CODE} ({}) {} {} {}",
        &key[0..3],
        &key[3..6],
        &key[6..8],
        &key[8..10]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_collapse_to_one_key() {
        assert_eq!(normalize("+905551234567"), "5551234567");
        assert_eq!(normalize("05551234567"), "5551234567");
        assert_eq!(normalize("(555) 123 45 67"), "5551234567");
        assert_eq!(normalize("+90 555-123-45-67"), "5551234567");
    }

    #[test]
    fn short_numbers_are_left_alone() {
        assert_eq!(normalize("555 12"), "55512");
        assert!(!is_valid("555 12"));
        assert!(is_valid("555 123 45 67"));
        assert!(!is_valid("555 123 45 67 89"));
    }

    #[test]
    fn trunk_zero_after_country_code() {
        assert_eq!(normalize("+90 0555 123 45 67"), "5551234567");
        assert!(is_valid("+90 0555 123 45 67"));
        assert_eq!(to_e164("+90 0555 123 45 67").as_deref(), Some("+905551234567"));
        assert!(same_number("+90 0555 123 45 67", "+905551234567"));
    }

    #[test]
    fn empty_numbers_never_match() {
        assert!(!same_number("", ""));
        assert!(same_number("+905551234567", "0 555 123 45 67"));
    }

    #[test]
    fn canonical_and_display_forms() {
        assert_eq!(to_e164("(555) 123 45 67").as_deref(), Some("+905551234567"));
        assert_eq!(to_e164("123"), None);
        assert_eq!(format_display("05551234567"), "+90 (555) 123 45 67");
        assert_eq!(format_display("12"), "12");
    }
}
