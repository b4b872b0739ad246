pub mod error;
pub mod extractor;
pub mod password;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use extractor::Auth;
pub use password::PasswordHasher;
pub use service::AuthService;
pub use token::{JwtIssuer, SigningSecret, TokenIssuer};
