pub mod query;
pub mod tcp;
