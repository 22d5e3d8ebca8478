/// One of the fixed visit slots offered on the booking form, weekdays
/// 10 AM through 4 PM on the hour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimeSlot {
    TenAm,
    ElevenAm,
    Noon,
    OnePm,
    TwoPm,
    ThreePm,
    FourPm,
}

impl TimeSlot {
    pub fn parse(s: &str) -> Result<TimeSlot, String> {
        match s.trim() {
            "10:00 AM" => Ok(TimeSlot::TenAm),
            "11:00 AM" => Ok(TimeSlot::ElevenAm),
            "12:00 PM" => Ok(TimeSlot::Noon),
            "1:00 PM" => Ok(TimeSlot::OnePm),
            "2:00 PM" => Ok(TimeSlot::TwoPm),
            "3:00 PM" => Ok(TimeSlot::ThreePm),
            "4:00 PM" => Ok(TimeSlot::FourPm),
            other => Err(format!("`{other}` is not an available appointment time")),
        }
    }

    pub fn all() -> [TimeSlot; 7] {
        [
            TimeSlot::TenAm,
            TimeSlot::ElevenAm,
            TimeSlot::Noon,
            TimeSlot::OnePm,
            TimeSlot::TwoPm,
            TimeSlot::ThreePm,
            TimeSlot::FourPm,
        ]
    }
}

/// 24-hour `HH:MM:SS` form, the representation stored with the appointment.
impl AsRef<str> for TimeSlot {
    fn as_ref(&self) -> &'static str {
        match self {
            TimeSlot::TenAm => "10:00:00",
            TimeSlot::ElevenAm => "11:00:00",
            TimeSlot::Noon => "12:00:00",
            TimeSlot::OnePm => "13:00:00",
            TimeSlot::TwoPm => "14:00:00",
            TimeSlot::ThreePm => "15:00:00",
            TimeSlot::FourPm => "16:00:00",
        }
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TimeSlot::TenAm => "10:00 AM",
            TimeSlot::ElevenAm => "11:00 AM",
            TimeSlot::Noon => "12:00 PM",
            TimeSlot::OnePm => "1:00 PM",
            TimeSlot::TwoPm => "2:00 PM",
            TimeSlot::ThreePm => "3:00 PM",
            TimeSlot::FourPm => "4:00 PM",
        };
        f.write_str(label)
    }
}
