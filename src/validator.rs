// Validation and sanitization of submitted booking payloads

use chrono::{Local, NaiveDate};
use regex::Regex;
use serde_json::Value;

use crate::booking::{Booking, RawBooking, RoomType};

/// Checks a raw booking payload against every intake rule and, on success,
/// returns the sanitized typed payload.
///
/// Rules are evaluated independently and never short-circuit: the caller gets
/// every violation in one pass, in a stable order.
pub struct Validator {
    email_re: Regex,
    phone_re: Regex,
    date_re: Regex,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    pub fn new() -> Self {
        // Conservative RFC-5322 subset: printable local part, alnum/hyphen
        // domain labels of at most 63 chars with no edge hyphens.
        let email_re = Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("email pattern is valid");
        let phone_re = Regex::new(r"^\+?[1-9]\d{0,15}$").expect("phone pattern is valid");
        let date_re = Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid");

        Self {
            email_re,
            phone_re,
            date_re,
        }
    }

    pub fn validate(&self, raw: &RawBooking) -> Result<Booking, Vec<String>> {
        self.validate_at(raw, Local::now().date_naive())
    }

    /// Validation with an explicit "today" so the past-date rule is
    /// deterministic under test.
    pub fn validate_at(&self, raw: &RawBooking, today: NaiveDate) -> Result<Booking, Vec<String>> {
        let mut errors = Vec::new();

        let name = raw.name.as_deref().unwrap_or("");
        if name.trim().chars().count() < 2 {
            errors.push("Name is required and must be at least 2 characters long".to_string());
        }

        let email = raw.email.as_deref().unwrap_or("").trim().to_string();
        if email.is_empty() {
            errors.push("Email is required".to_string());
        } else if !self.email_re.is_match(&email) {
            errors.push("Please provide a valid email address".to_string());
        }

        let mut arrival_date = None;
        match raw.arrival_date.as_deref().map(str::trim) {
            None | Some("") => errors.push("Arrival date is required".to_string()),
            Some(s) => match self.parse_calendar_date(s) {
                None => errors.push("Please provide a valid arrival date".to_string()),
                Some(date) if date < today => {
                    errors.push("Arrival date cannot be in the past".to_string())
                }
                Some(date) => arrival_date = Some(date),
            },
        }

        let mut nights = None;
        match &raw.nights {
            None | Some(Value::Null) => {
                errors.push("Number of nights is required".to_string())
            }
            Some(value) => match coerce_int(value) {
                Some(n) if (1..=30).contains(&n) => nights = Some(n as u32),
                _ => errors.push("Number of nights must be between 1 and 30".to_string()),
            },
        }

        let mut room_type = None;
        match raw.room_type.as_deref().map(str::trim) {
            None | Some("") => errors.push("Room type is required".to_string()),
            Some(s) => match s.parse::<RoomType>() {
                Ok(rt) => room_type = Some(rt),
                Err(()) => errors.push("Please select a valid room type".to_string()),
            },
        }

        let mut guests = None;
        match &raw.guests {
            None | Some(Value::Null) => {
                errors.push("Number of guests is required".to_string())
            }
            Some(value) => match coerce_int(value) {
                Some(n) if (1..=4).contains(&n) => guests = Some(n as u32),
                _ => errors.push("Number of guests must be between 1 and 4".to_string()),
            },
        }

        let phone = raw
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());
        if let Some(p) = phone {
            if !self.is_valid_phone(p) {
                errors.push("Please provide a valid phone number".to_string());
            }
        }

        // Second name rule, reported separately from the minimum-length one
        if !name.is_empty() && (name.chars().count() > 100 || name.chars().any(|c| c.is_ascii_digit()))
        {
            errors.push(
                "Name should not contain numbers and must be under 100 characters".to_string(),
            );
        }

        if let Some(requests) = raw.special_requests.as_deref() {
            if requests.chars().count() > 500 {
                errors.push("Special requests must be under 500 characters".to_string());
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let (Some(arrival_date), Some(nights), Some(room_type), Some(guests)) =
            (arrival_date, nights, room_type, guests)
        else {
            return Err(vec!["Validation failed".to_string()]);
        };

        Ok(Booking {
            name: sanitize_string(name),
            email: email.to_lowercase(),
            phone: phone.map(sanitize_string),
            arrival_date,
            nights,
            room_type,
            guests,
            special_requests: raw
                .special_requests
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(sanitize_string),
            newsletter: raw.newsletter.unwrap_or(false),
        })
    }

    // Strict YYYY-MM-DD only; chrono alone would accept unpadded components.
    fn parse_calendar_date(&self, s: &str) -> Option<NaiveDate> {
        if !self.date_re.is_match(s) {
            return None;
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
    }

    fn is_valid_phone(&self, phone: &str) -> bool {
        let cleaned: String = phone
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '(' && *c != ')')
            .collect();
        self.phone_re.is_match(&cleaned) && (7..=20).contains(&cleaned.chars().count())
    }
}

/// Trim, drop angle brackets, and collapse whitespace runs to single spaces.
pub fn sanitize_string(s: &str) -> String {
    let stripped: String = s
        .trim()
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

// Accepts JSON numbers and numeric strings; the reservation form posts strings
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn valid_raw() -> RawBooking {
        RawBooking {
            name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            phone: Some("+36 30 123 4567".to_string()),
            arrival_date: Some("2025-06-11".to_string()),
            nights: Some(json!(2)),
            room_type: Some("deluxe".to_string()),
            guests: Some(json!("2")),
            special_requests: Some("Late arrival".to_string()),
            newsletter: Some(true),
        }
    }

    #[test]
    fn test_valid_payload_passes_and_is_sanitized() {
        let validator = Validator::new();
        let mut raw = valid_raw();
        raw.name = Some("  Jane    <Doe>  ".to_string());
        raw.email = Some("  Jane@Example.COM ".to_string());
        raw.special_requests = Some("  Extra   pillows  please ".to_string());

        let booking = validator.validate_at(&raw, today()).unwrap();
        assert_eq!(booking.name, "Jane Doe");
        assert_eq!(booking.email, "jane@example.com");
        assert_eq!(booking.phone.as_deref(), Some("+36 30 123 4567"));
        assert_eq!(
            booking.special_requests.as_deref(),
            Some("Extra pillows please")
        );
        assert_eq!(booking.arrival_date, NaiveDate::from_ymd_opt(2025, 6, 11).unwrap());
        assert_eq!(booking.nights, 2);
        assert_eq!(booking.room_type, RoomType::Deluxe);
        assert_eq!(booking.guests, 2);
        assert!(booking.newsletter);
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let validator = Validator::new();
        let mut raw = valid_raw();
        raw.phone = None;
        raw.special_requests = None;
        raw.newsletter = None;

        let booking = validator.validate_at(&raw, today()).unwrap();
        assert!(booking.phone.is_none());
        assert!(booking.special_requests.is_none());
        assert!(!booking.newsletter);
    }

    #[test_case(
        |raw| raw.name = None,
        "Name is required and must be at least 2 characters long";
        "#1 missing name")]
    #[test_case(
        |raw| raw.name = Some(" J ".to_string()),
        "Name is required and must be at least 2 characters long";
        "#2 name too short after trim")]
    #[test_case(
        |raw| raw.name = Some("Jane D0e".to_string()),
        "Name should not contain numbers and must be under 100 characters";
        "#3 name with digits")]
    #[test_case(
        |raw| raw.name = Some("J".repeat(101)),
        "Name should not contain numbers and must be under 100 characters";
        "#4 name too long")]
    #[test_case(
        |raw| raw.email = None,
        "Email is required";
        "#5 missing email")]
    #[test_case(
        |raw| raw.email = Some("jane@-example.com".to_string()),
        "Please provide a valid email address";
        "#6 domain label with leading hyphen")]
    #[test_case(
        |raw| raw.arrival_date = None,
        "Arrival date is required";
        "#7 missing arrival date")]
    #[test_case(
        |raw| raw.arrival_date = Some("2025-13-40".to_string()),
        "Please provide a valid arrival date";
        "#8 impossible calendar date")]
    #[test_case(
        |raw| raw.arrival_date = Some("2025-6-11".to_string()),
        "Please provide a valid arrival date";
        "#9 unpadded date shape")]
    #[test_case(
        |raw| raw.arrival_date = Some("2025-05-31".to_string()),
        "Arrival date cannot be in the past";
        "#10 arrival in the past")]
    #[test_case(
        |raw| raw.nights = None,
        "Number of nights is required";
        "#11 missing nights")]
    #[test_case(
        |raw| raw.nights = Some(json!(31)),
        "Number of nights must be between 1 and 30";
        "#12 nights above cap")]
    #[test_case(
        |raw| raw.nights = Some(json!("abc")),
        "Number of nights must be between 1 and 30";
        "#13 unparseable nights")]
    #[test_case(
        |raw| raw.room_type = None,
        "Room type is required";
        "#14 missing room type")]
    #[test_case(
        |raw| raw.room_type = Some("penthouse".to_string()),
        "Please select a valid room type";
        "#15 unknown room type")]
    #[test_case(
        |raw| raw.guests = Some(json!(5)),
        "Number of guests must be between 1 and 4";
        "#16 too many guests")]
    #[test_case(
        |raw| raw.phone = Some("12 34".to_string()),
        "Please provide a valid phone number";
        "#17 phone too short")]
    #[test_case(
        |raw| raw.phone = Some("0123456789".to_string()),
        "Please provide a valid phone number";
        "#18 phone with leading zero")]
    #[test_case(
        |raw| raw.special_requests = Some("x".repeat(501)),
        "Special requests must be under 500 characters";
        "#19 special requests too long")]
    fn test_single_rule_violation(mutate: fn(&mut RawBooking), expected: &str) {
        let validator = Validator::new();
        let mut raw = valid_raw();
        mutate(&mut raw);

        let errors = validator.validate_at(&raw, today()).unwrap_err();
        assert_eq!(errors.len(), 1, "unexpected errors: {:?}", errors);
        assert_eq!(errors[0], expected);
    }

    #[test]
    fn test_errors_accumulate_across_rules() {
        let validator = Validator::new();
        let raw = RawBooking {
            name: Some("J4".to_string()),
            email: Some("not-an-email".to_string()),
            phone: Some("12".to_string()),
            arrival_date: Some("yesterday".to_string()),
            nights: Some(json!(0)),
            room_type: Some("igloo".to_string()),
            guests: Some(json!(9)),
            special_requests: Some("x".repeat(501)),
            newsletter: None,
        };

        let errors = validator.validate_at(&raw, today()).unwrap_err();
        // Every independent rule reports, nothing short-circuits
        assert_eq!(errors.len(), 8, "unexpected errors: {:?}", errors);
        assert!(errors.contains(
            &"Name should not contain numbers and must be under 100 characters".to_string()
        ));
        assert!(errors.contains(&"Please provide a valid email address".to_string()));
        assert!(errors.contains(&"Please provide a valid arrival date".to_string()));
        assert!(errors.contains(&"Number of nights must be between 1 and 30".to_string()));
        assert!(errors.contains(&"Please select a valid room type".to_string()));
        assert!(errors.contains(&"Number of guests must be between 1 and 4".to_string()));
        assert!(errors.contains(&"Please provide a valid phone number".to_string()));
        assert!(errors.contains(&"Special requests must be under 500 characters".to_string()));
    }

    #[test]
    fn test_phone_separators_are_stripped_before_matching() {
        let validator = Validator::new();
        let mut raw = valid_raw();
        raw.phone = Some("+1 (555) 123-4567".to_string());
        assert!(validator.validate_at(&raw, today()).is_ok());
    }

    #[test]
    fn test_arrival_today_is_allowed() {
        let validator = Validator::new();
        let mut raw = valid_raw();
        raw.arrival_date = Some("2025-06-01".to_string());
        assert!(validator.validate_at(&raw, today()).is_ok());
    }

    #[test]
    fn test_sanitize_string() {
        assert_eq!(sanitize_string("  a   b "), "a b");
        assert_eq!(sanitize_string("<script>alert</script>"), "scriptalert/script");
        assert_eq!(sanitize_string("Jane\t\nDoe"), "Jane Doe");
    }
}
