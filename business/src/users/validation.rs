//! Client-side checks for the profile and password dialogs.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use ustr::Ustr;

use crate::users::model::{UpdatePasswordRequest, UpdateUserRequest, User};

/// `local@domain.tld`, no whitespace, exactly one `@`.
pub static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Form field names, matching the keys the server uses in `errors`.
pub mod fields {
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const EMAIL: &str = "email";
    pub const USERNAME: &str = "username";
    pub const ROLES: &str = "roles";
    pub const CURRENT_PASSWORD: &str = "currentPassword";
    pub const NEW_PASSWORD: &str = "newPassword";
    pub const CONFIRM_PASSWORD: &str = "confirmPassword";
}

pub const MIN_PASSWORD_LEN: usize = 8;

/// Per-field error messages of the open form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    inner: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.inner.get(field).map(String::as_str)
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.inner.insert(field.into(), message.into());
    }

    /// Server errors win over whatever the client had for the same field.
    pub fn merge(&mut self, other: &BTreeMap<String, String>) {
        for (field, message) in other {
            self.inner.insert(field.clone(), message.clone());
        }
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub username: String,
    pub role_ids: Vec<Ustr>,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            role_ids: user.role_ids(),
        }
    }

    pub fn has_role(&self, id: Ustr) -> bool {
        self.role_ids.contains(&id)
    }

    pub fn set_role(&mut self, id: Ustr, selected: bool) {
        if selected {
            if !self.has_role(id) {
                self.role_ids.push(id);
            }
        } else {
            self.role_ids.retain(|r| *r != id);
        }
    }

    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.first_name.trim().is_empty() {
            errors.insert(fields::FIRST_NAME, "First name is required");
        }
        if self.last_name.trim().is_empty() {
            errors.insert(fields::LAST_NAME, "Last name is required");
        }
        let email = self.email.trim();
        if email.is_empty() {
            errors.insert(fields::EMAIL, "Email is required");
        } else if !EMAIL_REGEX.is_match(email) {
            errors.insert(fields::EMAIL, "Please enter a valid email address");
        }
        if self.username.trim().is_empty() {
            errors.insert(fields::USERNAME, "Username is required");
        }
        if self.role_ids.is_empty() {
            errors.insert(fields::ROLES, "At least one role must be selected");
        }
        errors
    }

    pub fn to_request(&self) -> UpdateUserRequest {
        UpdateUserRequest {
            is_active: None,
            first_name: Some(self.first_name.trim().to_owned()),
            last_name: Some(self.last_name.trim().to_owned()),
            email: Some(self.email.trim().to_owned()),
            username: Some(self.username.trim().to_owned()),
            roles: Some(self.role_ids.clone()),
        }
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl std::fmt::Debug for PasswordForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordForm").finish_non_exhaustive()
    }
}

impl PasswordForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.current_password.is_empty() {
            errors.insert(fields::CURRENT_PASSWORD, "Current password is required");
        }
        if self.new_password.is_empty() {
            errors.insert(fields::NEW_PASSWORD, "New password is required");
        } else if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(
                fields::NEW_PASSWORD,
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        if self.confirm_password.is_empty() {
            errors.insert(fields::CONFIRM_PASSWORD, "Please confirm your new password");
        } else if self.confirm_password != self.new_password {
            errors.insert(fields::CONFIRM_PASSWORD, "Passwords do not match");
        }
        errors
    }

    pub fn to_request(&self) -> UpdatePasswordRequest {
        UpdatePasswordRequest {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        }
    }
}
