pub mod errors;
pub mod service;

pub use errors::ConfigurationError;
pub use service::IssuedToken;
pub use service::TokenService;
pub use service::TokenSettings;
