/// Lifecycle of a newsletter issue: drafts become sent exactly once, and
/// there is no way back.
#[derive(Debug, PartialEq)]
pub enum NewsletterStatus {
    Draft,
    Sent,
}

impl AsRef<str> for NewsletterStatus {
    fn as_ref(&self) -> &'static str {
        match self {
            NewsletterStatus::Draft => "draft",
            NewsletterStatus::Sent => "sent",
        }
    }
}

impl TryFrom<String> for NewsletterStatus {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_ref() {
            "draft" => Ok(NewsletterStatus::Draft),
            "sent" => Ok(NewsletterStatus::Sent),
            other => Err(format!(
                "`{other}` is not a valid variant of NewsletterStatus",
            )),
        }
    }
}
