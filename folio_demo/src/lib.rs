use std::sync::LazyLock;

use chrono::{DateTime, TimeZone, Utc};

pub mod contact;

pub const NOW_MILLIS: i64 = 1_715_949_000_000;

pub static NOW: LazyLock<DateTime<Utc>> =
    LazyLock::new(|| Utc.timestamp_millis_opt(NOW_MILLIS).unwrap());

pub const SERVICE_ID: &str = "service_portfolio";
pub const TEMPLATE_ID: &str = "template_contact";
pub const PUBLIC_KEY: &str = "test-public-key";
