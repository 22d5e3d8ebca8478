use once_cell::sync::Lazy;
use unicode_segmentation::UnicodeSegmentation;

/// A person or organization name taken from a booking or contact form.
#[derive(Debug)]
pub struct RequesterName(String);

static FORBIDDEN_CHARS: [char; 10] = ['<', '>', '\'', '"', '\\', '(', ')', '{', '}', '/'];
static FORBIDDEN_CHARS_STRING: Lazy<String> = Lazy::new(|| String::from_iter(FORBIDDEN_CHARS));

impl RequesterName {
    pub fn parse(s: String) -> Result<RequesterName, String> {
        match s {
            _ if s.trim().is_empty() => Err(format!(
                "Name is empty or contains whitespace only: `{s}`"
            )),
            _ if s.graphemes(true).count() < 2 => {
                Err("Name must be at least 2 characters".to_string())
            }
            _ if s.graphemes(true).count() > 256 => {
                Err(format!("`{s}` is longer than 256 graphemes"))
            }
            _ if s.chars().any(|c| FORBIDDEN_CHARS.contains(&c)) => Err(format!(
                "`{s}` contains at least one of forbidden characters: {}",
                *FORBIDDEN_CHARS_STRING
            )),
            _ => Ok(Self(s)),
        }
    }
}

impl AsRef<str> for RequesterName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
