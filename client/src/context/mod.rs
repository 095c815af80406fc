pub mod recurring_payments;
pub mod token;
