pub mod checkout;
pub mod enums;
