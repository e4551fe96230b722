pub mod headers;
pub mod http;
pub mod request;

pub use http::ApiHttpClient;
pub use request::{RequestBody, RequestDescriptor};
