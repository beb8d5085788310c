//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use std::fmt;

use super::error::ValueObjectError;

/// Maximum display name length in bytes
pub const MAX_DISPLAY_NAME_BYTES: usize = 99;

/// Maximum message length in bytes
pub const MAX_MESSAGE_BYTES: usize = 1023;

/// Peer identifier value object.
///
/// Opaque and stable for the lifetime of one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeerId(u64);

impl PeerId {
    /// Create a PeerId from a raw value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Display name value object.
///
/// Set once when the peer connects. Construction sanitizes the raw input:
/// control characters are dropped, surrounding whitespace is trimmed, and the
/// result is truncated to [`MAX_DISPLAY_NAME_BYTES`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new DisplayName.
    ///
    /// # Arguments
    ///
    /// * `raw` - The name as received from the client
    ///
    /// # Returns
    ///
    /// A Result containing the DisplayName or an error if nothing is left
    /// after sanitizing
    pub fn new(raw: &str) -> Result<Self, ValueObjectError> {
        let cleaned: String = raw.chars().filter(|c| !c.is_control()).collect();
        let mut name = cleaned.trim().to_string();
        truncate_at_char_boundary(&mut name, MAX_DISPLAY_NAME_BYTES);
        let name = name.trim_end().to_string();

        if name.is_empty() {
            return Err(ValueObjectError::DisplayNameEmpty);
        }
        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

/// Message content value object.
///
/// One line of chat text without its line terminator, at most
/// [`MAX_MESSAGE_BYTES`] long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    /// Create a new MessageContent.
    ///
    /// Trailing `\r` / `\n` are stripped and over-long content is truncated.
    pub fn new(content: String) -> Result<Self, ValueObjectError> {
        let mut content = content;
        let stripped_len = content.trim_end_matches(['\r', '\n']).len();
        content.truncate(stripped_len);
        truncate_at_char_boundary(&mut content, MAX_MESSAGE_BYTES);

        if content.is_empty() {
            return Err(ValueObjectError::MessageContentEmpty);
        }
        Ok(Self(content))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (JST).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn truncate_at_char_boundary(value: &mut String, max_bytes: usize) {
    if value.len() <= max_bytes {
        return;
    }
    let mut end = max_bytes;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    value.truncate(end);
}
