//! # GS1 Check Digits
//!
//! The GS1 mod-10 check digit shared by GTIN, SSCC, GLN, GRAI, GDTI, GSRN,
//! GSIN, GCN and friends.
//!
//! Digits are weighted from the right: the rightmost digit of the data gets
//! weight 3, the next weight 1, alternating. The check digit brings the
//! weighted sum up to the next multiple of ten:
//!
//! ```text
//! check = (10 - (sum mod 10)) mod 10
//! ```
//!
//! ```
//! use gs1_core::checksum::{compute_check_digit, verify_check_digit};
//!
//! assert_eq!(compute_check_digit("1234567890123"), Some('1'));
//! assert!(verify_check_digit("12345678901231"));
//! ```

/// Compute the GS1 check digit over `digits`.
///
/// Returns `None` when `digits` is empty or contains anything other than
/// ASCII digits.
pub fn compute_check_digit(digits: &str) -> Option<char> {
    if digits.is_empty() {
        return None;
    }
    let mut sum: u32 = 0;
    for (position, byte) in digits.bytes().rev().enumerate() {
        if !byte.is_ascii_digit() {
            return None;
        }
        let weight = if position % 2 == 0 { 3 } else { 1 };
        sum += u32::from(byte - b'0') * weight;
    }
    let check = (10 - sum % 10) % 10;
    char::from_digit(check, 10)
}

/// Verify a digit string whose last digit is its check digit.
///
/// Returns `false` for strings shorter than two digits or containing
/// non-digits.
pub fn verify_check_digit(digits_including_check_digit: &str) -> bool {
    let Some((data, check)) = digits_including_check_digit
        .len()
        .checked_sub(1)
        .and_then(|split| digits_including_check_digit.split_at_checked(split))
    else {
        return false;
    };
    if data.is_empty() {
        return false;
    }
    compute_check_digit(data).is_some_and(|expected| check.starts_with(expected))
}

/// Verify the check digit stored at `offset` of a longer payload.
///
/// The check digit covers every digit before it; anything after `offset`
/// (ITIP piece and total counters, inline serials) is ignored.
pub fn verify_check_digit_at(payload: &str, offset: usize) -> bool {
    payload
        .get(..=offset)
        .is_some_and(verify_check_digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_gtin_check_digits() {
        assert_eq!(compute_check_digit("1234567890123"), Some('1'));
        assert_eq!(compute_check_digit("0061414100003"), Some('6'));
        assert_eq!(compute_check_digit("629104150021"), Some('3'));
    }

    #[test]
    fn known_sscc_check_digit() {
        assert_eq!(compute_check_digit("01234566663868985"), Some('2'));
        assert!(verify_check_digit("012345666638689852"));
    }

    #[test]
    fn known_twelve_digit_keys() {
        // GRAI / GDTI style 12-digit data.
        assert_eq!(compute_check_digit("123456789012"), Some('8'));
        assert!(verify_check_digit("1234567890128"));
        assert!(!verify_check_digit("1234567890123"));
    }

    #[test]
    fn all_zero_data_has_zero_check() {
        assert_eq!(compute_check_digit("0000000000000"), Some('0'));
    }

    #[test]
    fn rejects_non_numeric_and_empty() {
        assert_eq!(compute_check_digit(""), None);
        assert_eq!(compute_check_digit("12a4"), None);
        assert!(!verify_check_digit(""));
        assert!(!verify_check_digit("7"));
        assert!(!verify_check_digit("123x"));
    }

    #[test]
    fn verifies_at_offset() {
        // ITIP: GTIN-14 followed by piece and total.
        assert!(verify_check_digit_at("123456789012310102", 13));
        assert!(!verify_check_digit_at("123456789012390102", 13));
        assert!(!verify_check_digit_at("1234", 13));
    }

    #[test]
    fn multibyte_input_does_not_panic() {
        assert!(!verify_check_digit("12é"));
        assert!(!verify_check_digit_at("12é4", 2));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Appending the computed check digit always verifies.
        #[test]
        fn computed_digit_verifies(data in "[0-9]{1,17}") {
            let check = compute_check_digit(&data).unwrap();
            let full = format!("{data}{check}");
            prop_assert!(verify_check_digit(&full));
        }

        /// Changing the check digit to any other digit fails verification.
        #[test]
        fn wrong_digit_fails(data in "[0-9]{1,17}", bump in 1u32..10) {
            let check = compute_check_digit(&data).unwrap().to_digit(10).unwrap();
            let wrong = char::from_digit((check + bump) % 10, 10).unwrap();
            let full = format!("{data}{wrong}");
            prop_assert!(!verify_check_digit(&full));
        }

        /// Leading zeros do not change the check digit.
        #[test]
        fn leading_zeros_are_neutral(data in "[0-9]{1,12}", zeros in 0usize..5) {
            let padded = format!("{}{data}", "0".repeat(zeros));
            prop_assert_eq!(compute_check_digit(&data), compute_check_digit(&padded));
        }
    }
}
