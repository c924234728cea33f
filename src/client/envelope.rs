// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The `{ success, message, data }` envelope every API response uses.

use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Raw envelope as received. `data` is decoded separately so that endpoints
/// returning no payload still parse.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
    #[serde(default)]
    pub errors: Option<Value>,
}

impl RawEnvelope {
    pub fn parse(body: &str) -> Result<Self, ApiError> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(body).map_err(|e| ApiError::Decode(format!("Invalid envelope: {e}")))
    }

    /// Best available human-readable message.
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|m| !m.trim().is_empty())
    }

    /// Decode `data` into the caller's type. A missing `data` decodes as `null`.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.data.unwrap_or(Value::Null))
            .map_err(|e| ApiError::Decode(format!("Unexpected response data: {e}")))
    }
}

/// Pagination metadata returned next to list payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PageMeta {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// A page of results together with its metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// Total number of pages, computed from `total` and `limit` when the
    /// server did not send it.
    pub fn total_pages(&self) -> u32 {
        if let Some(pages) = self.meta.total_pages {
            return pages;
        }
        match self.meta.limit {
            Some(limit) if limit > 0 => self.meta.total.div_ceil(limit),
            _ => u32::from(self.meta.total > 0),
        }
    }

    pub fn has_next(&self) -> bool {
        self.meta.page < self.total_pages()
    }
}

impl<T: DeserializeOwned> Page<T> {
    pub(crate) fn from_envelope(envelope: RawEnvelope) -> Result<Self, ApiError> {
        let meta = envelope.meta.clone();
        let items: Vec<T> = envelope.into_data::<Option<Vec<T>>>()?.unwrap_or_default();
        let meta = meta.unwrap_or_else(|| PageMeta {
            page: 1,
            limit: None,
            total: items.len() as u32,
            total_pages: Some(1),
        });
        Ok(Self { items, meta })
    }
}

/// Collect a field-error map from a 422 body.
///
/// Accepts `{ "field": "msg" }`, `{ "field": ["msg", ...] }` and
/// `[{ "field"|"path"|"param": .., "message"|"msg": .. }]`.
pub(crate) fn field_errors(errors: Option<&Value>) -> BTreeMap<String, Vec<String>> {
    let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();

    match errors {
        Some(Value::Object(map)) => {
            for (field, value) in map {
                let messages: Vec<String> = match value {
                    Value::String(s) => vec![s.clone()],
                    Value::Array(items) => items
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect(),
                    _ => Vec::new(),
                };
                fields.entry(field.clone()).or_default().extend(messages);
            }
        }
        Some(Value::Array(items)) => {
            for item in items {
                let field = ["field", "path", "param"]
                    .iter()
                    .find_map(|k| item.get(*k).and_then(Value::as_str))
                    .unwrap_or("_");
                let message = ["message", "msg"]
                    .iter()
                    .find_map(|k| item.get(*k).and_then(Value::as_str));
                if let Some(message) = message {
                    fields
                        .entry(field.to_string())
                        .or_default()
                        .push(message.to_string());
                }
            }
        }
        _ => {}
    }

    fields.retain(|_, messages| {
        messages.retain(|m| !m.trim().is_empty());
        !messages.is_empty()
    });
    fields
}

/// First message in field-name order.
pub(crate) fn first_field_message(fields: &BTreeMap<String, Vec<String>>) -> Option<&str> {
    fields
        .values()
        .find_map(|messages| messages.first())
        .map(String::as_str)
}
