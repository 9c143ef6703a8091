use super::*;
use chrono::Duration;
use proptest::prelude::*;

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1900i32..2100, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

// ============================================================================
// V1: Whitelists
// ============================================================================

proptest! {
    /// V1.1: Any subset of the job types is accepted
    #[test]
    fn prop_v1_1_listed_job_types_accepted(picks in prop::sample::subsequence(JOB_TYPES.to_vec(), 0..=JOB_TYPES.len())) {
        let values: Vec<String> = picks.iter().map(|s| s.to_string()).collect();
        prop_assert!(validate_job_types(&values).is_ok());
    }

    /// V1.2: A value outside the shift list is always reported by name
    #[test]
    fn prop_v1_2_unknown_shift_rejected(bad in "[a-z]{1,20}") {
        let values = vec!["Day Shift".to_string(), bad.clone()];
        let err = validate_shifts(&values).unwrap_err();
        prop_assert_eq!(err.message.unwrap().to_string(), format!("{} is not a valid shift", bad));
    }

    /// V1.3: Unknown tags are rejected wherever they appear
    #[test]
    fn prop_v1_3_unknown_tag_rejected(bad in "[0-9]{1,5}", position in 0usize..3) {
        let mut values: Vec<String> = TAGS.iter().map(|s| s.to_string()).collect();
        values.insert(position, bad);
        prop_assert!(validate_tags(&values).is_err());
    }
}

// ============================================================================
// V2: Age rule
// ============================================================================

proptest! {
    /// V2.1: Age never exceeds the plain year difference
    #[test]
    fn prop_v2_1_age_bounded_by_year_diff(birth in arb_date(), today in arb_date()) {
        prop_assume!(birth <= today);
        let age = age_on(birth, today);
        let diff = today.year() - birth.year();
        prop_assert!(age == diff || age == diff - 1);
    }

    /// V2.2: Accepted birthdates always give an age inside the allowed range
    #[test]
    fn prop_v2_2_accepted_means_in_range(birth in arb_date(), today in arb_date()) {
        let age = age_on(birth, today);
        let accepted = validate_birthdate_on(&birth, today).is_ok();
        prop_assert_eq!(accepted, (MIN_AGE..=MAX_AGE).contains(&age));
    }

    /// V2.3: Rejection messages always mention the computed age
    #[test]
    fn prop_v2_3_message_mentions_age(birth in arb_date(), today in arb_date()) {
        if let Err(err) = validate_birthdate_on(&birth, today) {
            let age = age_on(birth, today);
            let message = err.message.unwrap().to_string();
            let expected = format!("Your age is {}.", age);
            prop_assert!(message.starts_with(&expected));
        }
    }
}

// ============================================================================
// V3: Phone, username, password
// ============================================================================

proptest! {
    /// V3.1: 12 to 14 digit numbers are valid phones
    #[test]
    fn prop_v3_1_digit_phones_accepted(phone in "[0-9]{12,14}") {
        prop_assert!(validate_phone(&phone).is_ok());
    }

    /// V3.2: Short numbers are rejected
    #[test]
    fn prop_v3_2_short_phones_rejected(phone in "[0-9]{0,11}") {
        prop_assert!(validate_phone(&phone).is_err());
    }

    /// V3.3: Plain word usernames up to 30 characters are accepted
    #[test]
    fn prop_v3_3_word_usernames_accepted(name in "[a-zA-Z0-9][a-zA-Z0-9_]{0,29}") {
        prop_assert!(validate_username_or_email(&name).is_ok());
    }

    /// V3.4: Usernames ending in a dot are rejected
    #[test]
    fn prop_v3_4_trailing_dot_rejected(name in "[a-z]{1,20}") {
        let name = format!("{}.", name);
        prop_assert!(validate_username_or_email(&name).is_err());
    }

    /// V3.5: Passwords built from all four classes pass the strength check
    #[test]
    fn prop_v3_5_mixed_passwords_accepted(
        lower in "[a-z]{2,6}",
        upper in "[A-Z]{2,6}",
        digits in "[0-9]{2,6}",
        symbols in "[!@#$%^&*]{2,6}",
    ) {
        let password = format!("{}{}{}{}", lower, upper, digits, symbols);
        prop_assert!(validate_password_strength(&password).is_ok());
    }

    /// V3.6: Passwords missing digits never pass
    #[test]
    fn prop_v3_6_without_digits_rejected(password in "[a-zA-Z!@#]{0,30}") {
        prop_assert!(validate_password_strength(&password).is_err());
    }
}

// ============================================================================
// V4: Dates and files
// ============================================================================

proptest! {
    /// V4.1: validate_not_before agrees with date ordering
    #[test]
    fn prop_v4_1_not_before_matches_ordering(date in arb_date(), offset in -400i64..400) {
        let floor = date + Duration::days(offset);
        let result = validate_not_before(&date, floor, "min_value", "too early");
        prop_assert_eq!(result.is_ok(), date >= floor);
    }

    /// V4.2: Files never pass the image validator unless they start with an image signature
    #[test]
    fn prop_v4_2_arbitrary_bytes_need_image_magic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let result = FileValidator::images().validate(&bytes);
        let is_image = bytes.starts_with(&[0xFF, 0xD8, 0xFF])
            || bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        prop_assert_eq!(result.is_ok(), is_image);
    }

    /// V4.3: filesizeformat always ends with a unit
    #[test]
    fn prop_v4_3_filesizeformat_has_unit(size in any::<u32>()) {
        let text = filesizeformat(size as u64);
        prop_assert!(
            text.ends_with("bytes") || text.ends_with("byte") || text.ends_with("KB")
                || text.ends_with("MB") || text.ends_with("GB")
        );
    }
}
