pub mod fallback;
pub mod http_backend;

pub use fallback::FallbackBackend;
pub use http_backend::HttpBackendAdapter;
