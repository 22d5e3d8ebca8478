mod appointment_date;
mod donation_amount;
mod email_address;
mod new_appointment;
mod newsletter_status;
mod order;
mod phone_number;
mod requester_name;
mod structured_address;
mod time_slot;
mod visit_location;

pub use appointment_date::AppointmentDate;
pub use donation_amount::DonationAmount;
pub use email_address::EmailAddress;
pub use new_appointment::NewAppointment;
pub use newsletter_status::NewsletterStatus;
pub use order::{Order, OrderStatus};
pub use phone_number::PhoneNumber;
pub use requester_name::RequesterName;
pub use structured_address::StructuredAddress;
pub use time_slot::TimeSlot;
pub use visit_location::VisitLocation;
