// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Form validation module.
//!
//! Every validator takes the raw form by value and returns either the
//! normalized input or the full list of problems found, in a stable order.

mod sanitize;

pub use sanitize::sanitize_text;

use blog_common::{LoginForm, PostDraft, PostForm, RegisterForm};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

// Common validation constants
const MIN_USERNAME_LENGTH: usize = 3;
const MIN_PASSWORD_LENGTH: usize = 6;

static USERNAME_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap());

pub const USERNAME_REQUIRED: &str = "You must provide a username";
pub const USERNAME_TOO_SHORT: &str = "Username must be at least 3 characters";
pub const USERNAME_INVALID_CHARS: &str = "Username can only contain letters and numbers";
pub const PASSWORD_REQUIRED: &str = "You must provide a password";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const USERNAME_TAKEN: &str = "User already exists";
/// The only message a failed login ever shows
pub const INVALID_CREDENTIALS: &str = "Invalid username/password";
pub const TITLE_REQUIRED: &str = "You must provide a title";
pub const BODY_REQUIRED: &str = "You must provide content";

/// User-visible validation messages for one form submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(Vec<String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(message: &str) -> Self {
        Self(vec![message.to_string()])
    }

    pub fn push(&mut self, message: &str) {
        self.0.push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// `Ok(value)` when nothing was collected
    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// A registration request that passed every field check
#[derive(Debug, Clone)]
pub struct Registration {
    /// Trimmed username
    pub username: String,
    pub password: String,
}

/// Validate a registration form, collecting every field error
///
/// Username availability is checked separately against the store, and only
/// once this passes.
pub fn validate_registration(form: RegisterForm) -> Result<Registration, FormErrors> {
    let mut errors = FormErrors::new();
    let username = form.username.trim().to_string();
    let password = form.password;

    if username.is_empty() {
        errors.push(USERNAME_REQUIRED);
    } else {
        if username.chars().count() < MIN_USERNAME_LENGTH {
            errors.push(USERNAME_TOO_SHORT);
        }
        if !USERNAME_REGEX.is_match(&username) {
            errors.push(USERNAME_INVALID_CHARS);
        }
    }

    if password.is_empty() {
        errors.push(PASSWORD_REQUIRED);
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.push(PASSWORD_TOO_SHORT);
    }

    errors.into_result(Registration { username, password })
}

/// Login input with the username trimmed
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Validate a login form; every failure is [`INVALID_CREDENTIALS`]
pub fn validate_login(form: LoginForm) -> Result<Credentials, FormErrors> {
    let username = form.username.trim().to_string();
    if username.is_empty() || form.password.is_empty() {
        return Err(FormErrors::single(INVALID_CREDENTIALS));
    }
    Ok(Credentials {
        username,
        password: form.password,
    })
}

/// A post submission that failed validation, with the sanitized values to re-render
#[derive(Debug, Clone)]
pub struct InvalidPost {
    pub draft: PostDraft,
    pub errors: FormErrors,
}

/// Sanitize and validate a post form, shared by create and edit
pub fn validate_post(form: PostForm) -> Result<PostDraft, InvalidPost> {
    let draft = PostDraft {
        title: sanitize_text(form.title.trim()),
        body: sanitize_text(form.body.trim()),
    };

    let mut errors = FormErrors::new();
    if draft.title.is_empty() {
        errors.push(TITLE_REQUIRED);
    }
    if draft.body.is_empty() {
        errors.push(BODY_REQUIRED);
    }

    if errors.is_empty() {
        Ok(draft)
    } else {
        Err(InvalidPost { draft, errors })
    }
}
