pub mod account_ops;
pub mod family_ops;
pub mod member_ops;
