pub mod password;
pub mod validation;

pub use password::{digest_password, verify_password, Password, PasswordDigest};
pub use validation::ValidatedJson;
