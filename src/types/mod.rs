//! Request and response bodies for the JSON API.

pub mod attendance;
pub mod lenient;
pub mod record;
pub mod student;

use serde::Serialize;

/// `{"message": "..."}` acknowledgement for writes without a payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Collects the names of absent required fields so a single 400 lists them all.
#[derive(Debug, Default)]
pub(crate) struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    /// Text counts as absent when missing, null or blank.
    pub(crate) fn text(&mut self, name: &'static str, value: Option<String>) -> String {
        match value.filter(|v| !v.trim().is_empty()) {
            Some(v) => v,
            None => {
                self.missing.push(name);
                String::new()
            }
        }
    }

    /// Zero counts as absent: roster numbers and ids start at 1.
    pub(crate) fn int(&mut self, name: &'static str, value: Option<i64>) -> i64 {
        value.filter(|v| *v != 0).unwrap_or_else(|| {
            self.missing.push(name);
            0
        })
    }

    pub(crate) fn finish<T>(self, value: T) -> Result<T, crate::HomeroomError> {
        if self.missing.is_empty() {
            Ok(value)
        } else {
            Err(crate::HomeroomError::MissingFields(self.missing))
        }
    }
}
