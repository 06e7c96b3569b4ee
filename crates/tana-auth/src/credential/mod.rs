//! Credential rules for sign-up and sign-in.

pub mod form;
pub mod password;
pub mod phone;

pub use form::{FieldErrors, RuleKind, SignInForm, SignUpForm, validate_sign_up};
pub use password::validate_password;
pub use phone::validate_phone;
