use std::{collections::HashMap, sync::LazyLock};

use chrono::{DateTime, Utc};
use nutype::nutype;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `local@domain.tld`, where no segment may be empty or contain whitespace or `@`.
pub static CONTACT_EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    #[serde(flatten)]
    pub author: ContactMessageAuthor,
    pub subject: ContactMessageSubject,
    #[serde(rename = "message")]
    pub content: ContactMessageContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessageAuthor {
    #[serde(rename = "from_name")]
    pub name: ContactMessageAuthorName,
    #[serde(rename = "from_email")]
    pub email: ContactEmailAddress,
}

#[nutype(
    validate(predicate = |s: &str| !s.trim().is_empty()),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, AsRef, Display, Serialize, Deserialize)
)]
pub struct ContactMessageAuthorName(String);

#[nutype(
    validate(regex = CONTACT_EMAIL_REGEX),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, AsRef, Display, Serialize, Deserialize)
)]
pub struct ContactEmailAddress(String);

#[nutype(
    validate(predicate = |s: &str| !s.trim().is_empty()),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, AsRef, Display, Serialize, Deserialize)
)]
pub struct ContactMessageSubject(String);

#[nutype(
    validate(predicate = |s: &str| !s.trim().is_empty()),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, AsRef, Display, Serialize, Deserialize)
)]
pub struct ContactMessageContent(String);

/// Millisecond clock reading at creation time, strictly increasing per process.
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Deref,
    From,
    Display,
    Serialize,
    Deserialize,
))]
pub struct ContactMessageId(i64);

/// A validated message as kept in the local backup log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessageRecord {
    #[serde(flatten)]
    pub message: ContactMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_email: Option<ContactEmailAddress>,
    pub timestamp: DateTime<Utc>,
    pub id: ContactMessageId,
}

/// Raw form values keyed by input name, as read from the contact form.
///
/// Missing fields read as empty strings and therefore fail validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormInput(HashMap<String, String>);

impl ContactFormInput {
    pub const FROM_NAME: &'static str = "from_name";
    pub const FROM_EMAIL: &'static str = "from_email";
    pub const SUBJECT: &'static str = "subject";
    pub const MESSAGE: &'static str = "message";

    pub fn new(
        from_name: impl Into<String>,
        from_email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        [
            (Self::FROM_NAME, from_name.into()),
            (Self::FROM_EMAIL, from_email.into()),
            (Self::SUBJECT, subject.into()),
            (Self::MESSAGE, message.into()),
        ]
        .into_iter()
        .collect()
    }

    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or_default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(String::is_empty)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ContactFormInput {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactValidationError {
    #[error("The sender name must not be empty.")]
    Name,
    #[error("The sender email address is invalid.")]
    Email,
    #[error("The subject must not be empty.")]
    Subject,
    #[error("The message must not be empty.")]
    Content,
}

impl TryFrom<&ContactFormInput> for ContactMessage {
    type Error = ContactValidationError;

    fn try_from(input: &ContactFormInput) -> Result<Self, Self::Error> {
        let name = ContactMessageAuthorName::try_new(input.get(ContactFormInput::FROM_NAME))
            .map_err(|_| ContactValidationError::Name)?;
        let email = ContactEmailAddress::try_new(input.get(ContactFormInput::FROM_EMAIL))
            .map_err(|_| ContactValidationError::Email)?;
        let subject = ContactMessageSubject::try_new(input.get(ContactFormInput::SUBJECT))
            .map_err(|_| ContactValidationError::Subject)?;
        let content = ContactMessageContent::try_new(input.get(ContactFormInput::MESSAGE))
            .map_err(|_| ContactValidationError::Content)?;

        Ok(Self {
            author: ContactMessageAuthor { name, email },
            subject,
            content,
        })
    }
}
