//! Captured HTTP responses and the list/page shapes the store returns.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

/// A fully read response. Every status, including 4xx/5xx, ends up here.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// Parsed JSON body; `None` for empty or non-JSON bodies
    pub body: Option<Value>,
    /// Raw body text, kept for diagnostics
    pub text: String,
    pub headers: HeaderMap,
}

impl ApiResponse {
    /// Build a response from its raw parts, parsing the body leniently.
    pub fn from_parts(status: StatusCode, headers: HeaderMap, bytes: &[u8]) -> Self {
        let body = if bytes.is_empty() {
            None
        } else {
            serde_json::from_slice(bytes).ok()
        };
        Self {
            status,
            body,
            text: String::from_utf8_lossy(bytes).into_owned(),
            headers,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Look up a value with a JSON pointer such as `/category/id`.
    pub fn field(&self, pointer: &str) -> Option<&Value> {
        self.body.as_ref().and_then(|body| body.pointer(pointer))
    }

    /// The `id` of a created or fetched resource.
    pub fn id(&self) -> Option<i64> {
        self.field("/id").and_then(as_id)
    }

    /// Best-effort error text: `message`, then `error`, then the raw body.
    pub fn message(&self) -> String {
        ["/message", "/error", "/details"]
            .iter()
            .find_map(|pointer| self.field(pointer).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| self.text.clone())
    }

    pub fn listing(&self) -> Option<Listing> {
        self.body.as_ref().and_then(Listing::from_value)
    }
}

impl fmt::Display for ApiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            Some(body) => write!(f, "status {} body {}", self.status.as_u16(), body),
            None if self.text.is_empty() => {
                write!(f, "status {} (empty body)", self.status.as_u16())
            }
            None => write!(f, "status {} body {:?}", self.status.as_u16(), self.text),
        }
    }
}

/// Ids arrive as JSON numbers, occasionally as numeric strings.
pub fn as_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Spring-style page wrapper.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub content: Vec<Value>,
    #[serde(default)]
    pub total_elements: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u64>,
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Collection endpoints answer with either a bare array or a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    List(Vec<Value>),
    Page(Page),
}

impl Listing {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(Self::List(items.clone())),
            Value::Object(map) if map.contains_key("content") => {
                serde_json::from_value(value.clone()).ok().map(Self::Page)
            }
            _ => None,
        }
    }

    pub fn items(&self) -> &[Value] {
        match self {
            Self::List(items) => items,
            Self::Page(page) => &page.content,
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Ids of every item that carries one.
    pub fn ids(&self) -> Vec<i64> {
        self.items()
            .iter()
            .filter_map(|item| item.get("id").and_then(as_id))
            .collect()
    }
}
