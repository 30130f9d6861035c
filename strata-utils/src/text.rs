//! The chat/text component value object.
//!
//! This is deliberately a plain, flat record rather than the full rendering
//! model a client implements: the wire only needs *some* valid JSON text
//! component, and its formatting rules are the embedding application's
//! concern, not this library's.

use std::io::{Result, Write};

use serde::{Deserialize, Serialize};

use crate::serial::WriteTo;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underlined: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obfuscated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with: Option<Vec<TextComponent>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<Vec<TextComponent>>,
}

impl TextComponent {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn translated(key: impl Into<String>) -> Self {
        Self {
            translate: Some(key.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl From<String> for TextComponent {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<&str> for TextComponent {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl WriteTo for TextComponent {
    fn write(&self, writer: &mut impl Write) -> Result<()> {
        let json = serde_json::to_string(self).map_err(std::io::Error::other)?;
        crate::serial::write_string(&json, writer)
    }
}
