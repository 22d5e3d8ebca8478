use once_cell::sync::Lazy;
use regex::Regex;

/// A contact phone number. Formatting characters are allowed, but the number
/// must carry at least 10 digits.
#[derive(Debug)]
pub struct PhoneNumber(String);

static ALLOWED_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ().-]+$").expect("Invalid phone number regex"));

const MIN_DIGITS: usize = 10;

impl PhoneNumber {
    pub fn parse(s: String) -> Result<PhoneNumber, String> {
        if !ALLOWED_SHAPE.is_match(s.trim()) {
            return Err(format!("`{s}` contains characters not allowed in a phone number"));
        }

        let digits = s.chars().filter(char::is_ascii_digit).count();
        if digits < MIN_DIGITS {
            return Err("Please enter a valid phone number".to_string());
        }

        Ok(Self(s))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
