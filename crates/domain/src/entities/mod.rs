pub mod date_range;
pub mod group;
pub mod incentive;
pub mod membership;
pub mod purchase;
pub mod record;
pub mod settlement;
pub mod user;

pub use date_range::*;
pub use group::*;
pub use incentive::*;
pub use membership::*;
pub use purchase::*;
pub use record::*;
pub use settlement::*;
pub use user::*;

use crate::errors::DomainError;
use rust_decimal::Decimal;

/// Monetary amounts are fixed-point with at most 2 fractional digits and
/// never negative. Every write path validates through here.
pub fn validate_amount(amount: Decimal) -> Result<(), DomainError> {
    if amount.is_sign_negative() {
        return Err(DomainError::ValidationError(
            "Amount cannot be negative".to_string(),
        ));
    }
    if amount.scale() > 2 {
        return Err(DomainError::ValidationError(format!(
            "Amount {} has more than 2 decimal places",
            amount
        )));
    }
    Ok(())
}
