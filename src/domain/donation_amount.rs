/// A charge amount in minor currency units (US cents).
///
/// Checkout sessions are only created for amounts between $1.00 and
/// $10,000.00 inclusive; anything outside that range is rejected before the
/// payment provider is contacted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DonationAmount(i64);

pub const MIN_AMOUNT_CENTS: i64 = 100;
pub const MAX_AMOUNT_CENTS: i64 = 1_000_000;

impl DonationAmount {
    pub fn parse(cents: i64) -> Result<DonationAmount, String> {
        if (MIN_AMOUNT_CENTS..=MAX_AMOUNT_CENTS).contains(&cents) {
            Ok(Self(cents))
        } else {
            Err(format!(
                "Amount must be between {MIN_AMOUNT_CENTS} and {MAX_AMOUNT_CENTS} cents, got {cents}"
            ))
        }
    }

    pub fn as_cents(&self) -> i64 {
        self.0
    }

    /// `"12.50"`-style dollar rendering for email templates.
    pub fn formatted_dollars(&self) -> String {
        format!("{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
