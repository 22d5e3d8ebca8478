use super::{AppointmentDate, PhoneNumber, RequesterName, TimeSlot, VisitLocation};

/// A fully-validated booking request, ready to be persisted.
pub struct NewAppointment {
    pub name: RequesterName,
    pub business_name: RequesterName,
    pub contact_number: PhoneNumber,
    pub location: VisitLocation,
    pub date: AppointmentDate,
    pub time: TimeSlot,
    pub notes: Option<String>,
}
