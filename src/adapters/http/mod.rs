//! HTTP adapter for the admin backend.

mod api_client;
mod call_options;

pub use api_client::ApiClient;
pub use call_options::CallOptions;
