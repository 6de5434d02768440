// Fetcher module: the I/O boundary trait plus its HTTP implementation.

pub mod http;
pub mod traits;

pub use http::HttpDataSource;
pub use traits::{DataSource, default_window};
