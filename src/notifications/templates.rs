use crate::{domain::Order, storage_client::DownloadLink};

/// A ready-to-send message. Templates are fixed; only the payload varies.
#[derive(Clone, Debug)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl RenderedEmail {
    /// Substitutes the `{{email}}` placeholder (unsubscribe links in bulk
    /// sends) with a concrete recipient address.
    pub fn personalize(&self, email: &str) -> RenderedEmail {
        RenderedEmail {
            subject: self.subject.clone(),
            html: self.html.replace("{{email}}", email),
            text: self.text.replace("{{email}}", email),
        }
    }
}

pub struct AppointmentSummary<'a> {
    pub name: &'a str,
    pub business_name: &'a str,
    pub contact_number: &'a str,
    pub location: &'a str,
    pub date: &'a str,
    pub time: &'a str,
    pub notes: Option<&'a str>,
}

pub fn appointment_booked(appointment: &AppointmentSummary<'_>) -> RenderedEmail {
    let notes_html = match appointment.notes {
        Some(notes) if !notes.is_empty() => format!("<h3>Notes:</h3><p>{notes}</p>"),
        _ => String::new(),
    };

    let html = format!(
        r#"<h2>New Appointment Booking</h2>
<p>A new appointment has been scheduled:</p>

<h3>Appointment Details:</h3>
<ul>
  <li><strong>Date:</strong> {date}</li>
  <li><strong>Time:</strong> {time}</li>
  <li><strong>Location:</strong> {location}</li>
</ul>

<h3>Contact Information:</h3>
<ul>
  <li><strong>Name:</strong> {name}</li>
  <li><strong>Business:</strong> {business}</li>
  <li><strong>Phone:</strong> {phone}</li>
</ul>

{notes_html}

<p>Please contact the client to confirm the appointment details.</p>"#,
        date = appointment.date,
        time = appointment.time,
        location = appointment.location,
        name = appointment.name,
        business = appointment.business_name,
        phone = appointment.contact_number,
    );

    let text = format!(
        "New appointment booking\n\nDate: {}\nTime: {}\nLocation: {}\nName: {}\nBusiness: {}\nPhone: {}\n{}\nPlease contact the client to confirm the appointment details.",
        appointment.date,
        appointment.time,
        appointment.location,
        appointment.name,
        appointment.business_name,
        appointment.contact_number,
        appointment
            .notes
            .filter(|notes| !notes.is_empty())
            .map(|notes| format!("Notes: {notes}\n"))
            .unwrap_or_default(),
    );

    RenderedEmail {
        subject: "New Appointment Booking - Pawprints Therapy Visits".to_string(),
        html,
        text,
    }
}

pub struct ContactSummary<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub organization: Option<&'a str>,
    pub address: Option<&'a str>,
    pub subject: &'a str,
    pub message: &'a str,
}

pub fn contact_received(contact: &ContactSummary<'_>) -> RenderedEmail {
    let optional_row = |label: &str, value: Option<&str>| match value {
        Some(value) if !value.is_empty() => {
            format!("<li><strong>{label}:</strong> {value}</li>")
        }
        _ => String::new(),
    };

    let html = format!(
        r#"<h2>New Contact Form Submission</h2>
<p>A new contact form has been submitted:</p>

<h3>Contact Information:</h3>
<ul>
  <li><strong>Name:</strong> {first} {last}</li>
  <li><strong>Email:</strong> {email}</li>
  {phone_row}
  {organization_row}
  {address_row}
</ul>

<h3>Subject:</h3>
<p>{subject}</p>

<h3>Message:</h3>
<p style="white-space: pre-wrap;">{message}</p>

<p>Please respond to this inquiry within 24-48 hours.</p>"#,
        first = contact.first_name,
        last = contact.last_name,
        email = contact.email,
        phone_row = optional_row("Phone", contact.phone),
        organization_row = optional_row("Organization", contact.organization),
        address_row = optional_row("Address", contact.address),
        subject = contact.subject,
        message = contact.message,
    );

    let text = format!(
        "New contact form submission\n\nName: {} {}\nEmail: {}\nSubject: {}\n\n{}\n\nPlease respond to this inquiry within 24-48 hours.",
        contact.first_name, contact.last_name, contact.email, contact.subject, contact.message,
    );

    RenderedEmail {
        subject: format!("New Contact Form Submission: {}", contact.subject),
        html,
        text,
    }
}

pub fn contact_confirmation(first_name: &str, subject: &str, message: &str) -> RenderedEmail {
    let html = format!(
        r#"<h2>Thank You for Contacting Us!</h2>
<p>Hello {first_name},</p>

<p>We have received your message and will reach out within 24-48 hours.</p>

<h3>Your Message:</h3>
<ul>
  <li><strong>Subject:</strong> {subject}</li>
  <li><strong>Message:</strong></li>
</ul>
<p style="white-space: pre-wrap; background: #f5f5f5; padding: 10px; border-radius: 5px;">{message}</p>

<p>Best regards,<br>The Pawprints Team</p>"#,
    );

    let text = format!(
        "Hello {first_name},\n\nWe have received your message and will reach out within 24-48 hours.\n\nSubject: {subject}\nMessage: {message}\n\nBest regards,\nThe Pawprints Team",
    );

    RenderedEmail {
        subject: "Your message has been received - Pawprints Therapy Visits".to_string(),
        html,
        text,
    }
}

/// Newsletter issue body. The `{{email}}` placeholder in the unsubscribe
/// link is swapped per recipient via [`RenderedEmail::personalize`].
pub fn newsletter_issue(title: &str, content: &str, base_url: &str) -> RenderedEmail {
    let unsubscribe_url = format!("{base_url}/subscriptions/unsubscribe?email={{{{email}}}}");

    let html = format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
  </head>
  <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="text-align: center; margin-bottom: 30px;">
      <h1 style="color: #2c5530; margin-bottom: 10px;">Pawprints Therapy Visits</h1>
      <p style="color: #666; margin: 0;">Comfort on four paws</p>
    </div>

    <div style="background: #f9f9f9; padding: 30px; border-radius: 8px; margin-bottom: 30px;">
      <h2 style="color: #2c5530; margin-top: 0;">{title}</h2>
      <div style="white-space: pre-line; color: #333;">
        {content}
      </div>
    </div>

    <div style="text-align: center; padding-top: 20px; border-top: 1px solid #eee;">
      <p style="color: #666; font-size: 14px; margin-bottom: 10px;">
        Thank you for subscribing to our newsletter!
      </p>
      <p style="color: #666; font-size: 12px;">
        <a href="{unsubscribe_url}" style="color: #666; text-decoration: underline;">
          Unsubscribe
        </a>
      </p>
    </div>
  </body>
</html>"#,
    );

    let text = format!(
        "{title}\n\n{content}\n\nThank you for subscribing to our newsletter!\nUnsubscribe: {unsubscribe_url}",
    );

    RenderedEmail {
        subject: title.to_string(),
        html,
        text,
    }
}

pub fn newsletter_confirmation(name: Option<&str>) -> RenderedEmail {
    let greeting = name.map(|n| format!(", {n}")).unwrap_or_default();

    let html = format!(
        r#"<div style="max-width: 600px; margin: 0 auto; font-family: Arial, sans-serif;">
  <h1 style="color: #4ade80; text-align: center;">Welcome to the Pawprints Newsletter!</h1>
  <p>Thank you for subscribing to our newsletter{greeting}!</p>
  <p>You'll now receive updates about:</p>
  <ul>
    <li>Maple's upcoming therapy visits</li>
    <li>Photos and stories from recent visits</li>
    <li>Fundraising news and donation updates</li>
    <li>New gallery additions</li>
  </ul>
  <p>We're excited to have you along for the journey!</p>
  <p style="margin-top: 30px;">
    <strong>Pawprints Therapy Visits</strong><br>
    Comfort on four paws
  </p>
</div>"#,
    );

    let text = format!(
        "Thank you for subscribing to our newsletter{greeting}!\n\nYou'll now receive updates about Maple's visits, photos and stories, fundraising news, and new gallery additions.\n\nPawprints Therapy Visits",
    );

    RenderedEmail {
        subject: "Welcome to the Pawprints Newsletter!".to_string(),
        html,
        text,
    }
}

pub fn welcome(name: Option<&str>) -> RenderedEmail {
    let greeting = name.map(|n| format!(" {n}")).unwrap_or_default();

    let html = format!(
        r#"<div style="max-width: 600px; margin: 0 auto; font-family: Arial, sans-serif;">
  <h1 style="color: #4ade80; text-align: center;">Welcome!</h1>
  <p>Hello{greeting},</p>
  <p>Welcome to Pawprints Therapy Visits. Maple and her handler bring comfort visits to schools, hospitals, and care facilities across the area.</p>
  <p>Feel free to reach out if you have any questions or would like to schedule a visit.</p>
  <p style="margin-top: 30px;">
    <strong>Pawprints Therapy Visits</strong><br>
    Comfort on four paws
  </p>
</div>"#,
    );

    let text = format!(
        "Hello{greeting},\n\nWelcome to Pawprints Therapy Visits. Feel free to reach out if you have any questions or would like to schedule a visit.\n\nPawprints Therapy Visits",
    );

    RenderedEmail {
        subject: "Welcome to Pawprints Therapy Visits".to_string(),
        html,
        text,
    }
}

pub struct PhotoSubmissionSummary<'a> {
    pub submission_id: &'a str,
    pub event_date: &'a str,
    pub photo_count: usize,
    pub story: Option<&'a str>,
    pub submitter_name: Option<&'a str>,
    pub submitter_email: Option<&'a str>,
}

pub fn photo_submitted(submission: &PhotoSubmissionSummary<'_>) -> RenderedEmail {
    let optional_row = |label: &str, value: Option<&str>| match value {
        Some(value) if !value.is_empty() => {
            format!("<li><strong>{label}:</strong> {value}</li>")
        }
        _ => String::new(),
    };
    let story_html = match submission.story {
        Some(story) if !story.is_empty() => format!("<h3>Story:</h3><p>{story}</p>"),
        _ => String::new(),
    };

    let html = format!(
        r#"<h2>New Photo Submission</h2>
<p>A new photo submission has been received for the gallery:</p>

<h3>Submission Details:</h3>
<ul>
  <li><strong>Event Date:</strong> {event_date}</li>
  <li><strong>Number of Photos:</strong> {photo_count}</li>
  {submitter_row}
  {email_row}
</ul>

{story_html}

<p>Please review and approve/reject this submission in the admin dashboard.</p>
<p><strong>Submission ID:</strong> {submission_id}</p>"#,
        event_date = submission.event_date,
        photo_count = submission.photo_count,
        submitter_row = optional_row("Submitted by", submission.submitter_name),
        email_row = optional_row("Email", submission.submitter_email),
        submission_id = submission.submission_id,
    );

    let text = format!(
        "New photo submission for the gallery.\n\nEvent date: {}\nPhotos: {}\nSubmission ID: {}\n\nPlease review and approve/reject this submission in the admin dashboard.",
        submission.event_date, submission.photo_count, submission.submission_id,
    );

    RenderedEmail {
        subject: "New Photo Submission - Pawprints Gallery".to_string(),
        html,
        text,
    }
}

pub fn donation_received(
    donor_email: &str,
    formatted_amount: &str,
    donor_name: Option<&str>,
    date: &str,
) -> RenderedEmail {
    let donor_row = match donor_name {
        Some(name) if !name.is_empty() => {
            format!("<li><strong>Donor Name:</strong> {name}</li>")
        }
        _ => String::new(),
    };

    let html = format!(
        r#"<h2>New Donation Received</h2>
<p>A new donation has been processed:</p>

<h3>Donation Details:</h3>
<ul>
  <li><strong>Amount:</strong> ${formatted_amount}</li>
  <li><strong>Donor Email:</strong> {donor_email}</li>
  {donor_row}
  <li><strong>Date:</strong> {date}</li>
</ul>

<p>Thank you for the continued support of Maple's mission!</p>"#,
    );

    let text = format!(
        "New donation received.\n\nAmount: ${formatted_amount}\nDonor email: {donor_email}\nDate: {date}",
    );

    RenderedEmail {
        subject: format!("New Donation Received - ${formatted_amount}"),
        html,
        text,
    }
}

pub fn donation_thanks(
    formatted_amount: &str,
    donor_name: Option<&str>,
    processed_at: &str,
) -> RenderedEmail {
    let salutation = match donor_name {
        Some(name) if !name.is_empty() => format!("<p>Dear {name},</p>"),
        _ => "<p>Dear Supporter,</p>".to_string(),
    };

    let html = format!(
        r#"<h2>Thank You for Your Donation!</h2>
{salutation}

<p>Thank you for your generous donation of <strong>${formatted_amount}</strong> to support Maple's therapy mission.</p>

<p>Your contribution will help us:</p>
<ul>
  <li>Cover travel costs for therapy visits</li>
  <li>Maintain Maple's training and certifications</li>
  <li>Purchase supplies and equipment needed for visits</li>
  <li>Reach more people in need of comfort</li>
</ul>

<p>Because of supporters like you, Maple can keep bringing joy to those who need it most.</p>

<p>With heartfelt gratitude,<br>The Pawprints Team</p>

<hr style="margin: 20px 0; border: none; border-top: 1px solid #eee;">
<p style="font-size: 12px; color: #666;">
  This donation was processed on {processed_at}.<br>
  If you have any questions about your donation, please contact us.
</p>"#,
    );

    let text = format!(
        "Thank you for your generous donation of ${formatted_amount} to support Maple's therapy mission.\n\nProcessed on {processed_at}.\n\nWith heartfelt gratitude,\nThe Pawprints Team",
    );

    RenderedEmail {
        subject: "Thank you for your donation - Pawprints Therapy Visits".to_string(),
        html,
        text,
    }
}

pub fn order_confirmation(order: &Order, links: &[DownloadLink]) -> RenderedEmail {
    let links_html: String = links
        .iter()
        .map(|link| {
            format!(
                r#"<li><a href="{}" style="color: #2754C5; text-decoration: underline;">{}</a></li>"#,
                link.url, link.filename,
            )
        })
        .collect();
    let links_text: String = links
        .iter()
        .map(|link| format!("{}: {}\n", link.filename, link.url))
        .collect();
    let amount_dollars = format!("{}.{:02}", order.amount / 100, order.amount % 100);

    let html = format!(
        r#"<h2>Thank You for Your Purchase!</h2>
<p>Your order has been confirmed and is ready for download.</p>

<h3>Order Details:</h3>
<ul>
  <li><strong>Product:</strong> {product}</li>
  <li><strong>Amount:</strong> ${amount_dollars} {currency}</li>
  <li><strong>Order ID:</strong> {order_id}</li>
</ul>

<h3>Download Your Files:</h3>
<ul>
  {links_html}
</ul>

<p><strong>Important:</strong> Your download links will expire in 30 days. Please download your files as soon as possible.</p>

<p>Thank you for supporting Maple's therapy mission!</p>

<p>Best regards,<br>The Pawprints Team</p>"#,
        product = order.product_name,
        currency = order.currency.to_uppercase(),
        order_id = order.id,
    );

    let text = format!(
        "Your order has been confirmed.\n\nProduct: {}\nAmount: ${} {}\nOrder ID: {}\n\nDownloads:\n{}\nYour download links will expire in 30 days.",
        order.product_name,
        amount_dollars,
        order.currency.to_uppercase(),
        order.id,
        links_text,
    );

    RenderedEmail {
        subject: "Order Confirmation & Download Links - Pawprints Therapy Visits".to_string(),
        html,
        text,
    }
}
