//! Types shared by the authenticated admin API client and its callers.

mod environment;
mod error;

pub use environment::ApiEnvironment;
pub use error::{ApiError, StatusClass};
