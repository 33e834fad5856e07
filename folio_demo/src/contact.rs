use std::sync::LazyLock;

use chrono::Duration;
use folio_models::contact::{
    ContactEmailAddress, ContactFormInput, ContactMessage, ContactMessageRecord,
};

use crate::{NOW, NOW_MILLIS};

pub static ANA: LazyLock<ContactFormInput> =
    LazyLock::new(|| ContactFormInput::new("Ana", "ana@x.com", "Hi", "Hello"));

pub static ANA_MESSAGE: LazyLock<ContactMessage> =
    LazyLock::new(|| ContactMessage::try_from(&*ANA).unwrap());

pub static BAD_EMAIL: LazyLock<ContactFormInput> =
    LazyLock::new(|| ContactFormInput::new("Ana", "bad-email", "Hi", "Hello"));

pub static RECIPIENT: LazyLock<ContactEmailAddress> =
    LazyLock::new(|| "me@example.com".try_into().unwrap());

/// The `n`th of a series of distinct valid submissions.
pub fn numbered(n: usize) -> ContactFormInput {
    ContactFormInput::new(
        format!("Sender {n}"),
        format!("sender{n}@example.com"),
        format!("Subject {n}"),
        format!("Message number {n}"),
    )
}

/// The stored form of [`numbered`], created `n` milliseconds after [`NOW`].
pub fn numbered_record(n: usize) -> ContactMessageRecord {
    let offset = i64::try_from(n).unwrap();
    ContactMessageRecord {
        message: ContactMessage::try_from(&numbered(n)).unwrap(),
        to_email: None,
        timestamp: *NOW + Duration::milliseconds(offset),
        id: (NOW_MILLIS + offset).into(),
    }
}
