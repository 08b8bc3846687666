pub mod account;
pub mod borrow;
pub mod liquidation;
pub mod withdraw;
