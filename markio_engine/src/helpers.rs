use markio_common::Cents;
use rust_decimal::Decimal;

/// Validates a user-supplied amount in major units and converts it to minor units.
///
/// The amount must be strictly positive and carry at most two decimal places.
pub fn amount_to_cents(amount: Decimal) -> Result<Cents, String> {
    if amount <= Decimal::ZERO {
        return Err(format!("Amount must be positive, but was {amount}"));
    }
    if amount.normalize().scale() > 2 {
        return Err(format!("Amount {amount} has more than two decimal places"));
    }
    Cents::from_decimal(amount).map_err(|e| e.to_string())
}
