//! Sign-up and sign-in forms and their field-level validation.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::{validate_password, validate_phone};

/// Field name → message for every field that failed validation.
pub type FieldErrors = BTreeMap<String, String>;

/// Category of a failed field rule. Each kind has one fixed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Field is empty.
    Required,
    /// Email does not have a valid shape.
    MalformedEmail,
    /// Phone fails [`validate_phone`].
    MalformedPhone,
    /// Any other rule, including a weak password.
    Generic,
}

impl RuleKind {
    const REQUIRED: &'static str = "required";
    const EMAIL: &'static str = "email";
    const PHONE: &'static str = "phone";

    fn from_code(code: &str) -> Self {
        match code {
            Self::REQUIRED => Self::Required,
            Self::EMAIL => Self::MalformedEmail,
            Self::PHONE => Self::MalformedPhone,
            _ => Self::Generic,
        }
    }

    /// Message reported to the client.
    pub fn message(self) -> &'static str {
        match self {
            Self::Required => "This field is required!",
            Self::MalformedEmail => "Invalid email format!",
            Self::MalformedPhone => "Invalid phone number!",
            Self::Generic => "Invalid field!",
        }
    }
}

fn phone_rule(value: &str) -> Result<(), ValidationError> {
    if validate_phone(value) {
        Ok(())
    } else {
        Err(ValidationError::new(RuleKind::PHONE))
    }
}

fn password_rule(value: &str) -> Result<(), ValidationError> {
    if validate_password(value) {
        Ok(())
    } else {
        Err(ValidationError::new("password"))
    }
}

/// Sign-up request body.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignUpForm {
    /// First name.
    #[serde(default)]
    #[validate(length(min = 1, code = "required"))]
    pub name: String,
    /// Last name.
    #[serde(default)]
    #[validate(length(min = 1, code = "required"))]
    pub last_name: String,
    /// Email address.
    #[serde(default)]
    #[validate(length(min = 1, code = "required"), email(code = "email"))]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    #[validate(
        length(min = 1, code = "required"),
        custom(function = "password_rule")
    )]
    pub password: String,
    /// Phone number.
    #[serde(default)]
    #[validate(length(min = 1, code = "required"), custom(function = "phone_rule"))]
    pub phone: String,
}

/// Sign-in request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignInForm {
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
}

impl SignInForm {
    /// Names of empty fields, in form order.
    pub fn missing_fields(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for (field, value) in [("email", &self.email), ("password", &self.password)] {
            if value.is_empty() {
                errors.insert(field.to_string(), RuleKind::Required.message().to_string());
            }
        }
        errors
    }
}

/// Validate a sign-up form, producing one message per failing field.
///
/// When a field breaks several rules the `Required` message wins; otherwise
/// the first rule declared on the field is reported.
pub fn validate_sign_up(form: &SignUpForm) -> Result<(), FieldErrors> {
    let Err(errors) = form.validate() else {
        return Ok(());
    };

    let fields = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let kind = errs
                .iter()
                .map(|e| RuleKind::from_code(&e.code))
                .min_by_key(|k| *k != RuleKind::Required)?;
            Some((Cow::into_owned(field), kind.message().to_string()))
        })
        .collect();

    Err(fields)
}
