/// The address where a therapy visit takes place. Free text; a structured
/// address may accompany it when the autocomplete provider resolved one.
#[derive(Debug)]
pub struct VisitLocation(String);

const MIN_LENGTH: usize = 5;

impl VisitLocation {
    pub fn parse(s: String) -> Result<VisitLocation, String> {
        if s.trim().len() < MIN_LENGTH {
            Err("Please provide a detailed location".to_string())
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for VisitLocation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
