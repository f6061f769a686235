//! Logevent - normalization of retrieved CloudWatch log events for display and sorting.

pub mod event;
pub mod flatten;
pub mod parse;
pub mod types;
