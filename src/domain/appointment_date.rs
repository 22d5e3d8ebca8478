use time::{format_description::FormatItem, macros::format_description, Date};

/// A requested visit date, `YYYY-MM-DD`. Must lie strictly in the future
/// relative to the supplied reference date.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppointmentDate(Date);

static DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

impl AppointmentDate {
    pub fn parse(s: &str, today: Date) -> Result<AppointmentDate, String> {
        let date = Date::parse(s, DATE_FORMAT)
            .map_err(|_| format!("`{s}` is not a valid date (expected YYYY-MM-DD)"))?;

        if date <= today {
            return Err("Please select a future date".to_string());
        }

        Ok(Self(date))
    }

    pub fn as_date(&self) -> Date {
        self.0
    }
}
