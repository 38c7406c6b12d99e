//! Request body payloads.

use axum::body::Bytes;

pub const TEXT_PLAIN_UTF_8: &str = "text/plain; charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json";
pub const APPLICATION_XML: &str = "application/xml; charset=utf-8";
pub const APPLICATION_FORM: &str = "application/x-www-form-urlencoded";
pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";

/// Payload carried by a mock request.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Raw bytes; no content type is inferred.
    Bytes(Bytes),
    Text(String),
    Json(serde_json::Value),
    /// Url-encoded form fields, in order.
    Form(Vec<(String, String)>),
    /// Serialized XML markup.
    Xml(String),
}

impl RequestBody {
    /// Content type a real client would send for this body kind.
    pub fn inferred_content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::Empty | RequestBody::Bytes(_) => None,
            RequestBody::Text(_) => Some(TEXT_PLAIN_UTF_8),
            RequestBody::Json(_) => Some(APPLICATION_JSON),
            RequestBody::Form(_) => Some(APPLICATION_FORM),
            RequestBody::Xml(_) => Some(APPLICATION_XML),
        }
    }

    /// Encode the payload to the bytes a handler will read.
    pub fn to_bytes(&self) -> Bytes {
        match self {
            RequestBody::Empty => Bytes::new(),
            RequestBody::Bytes(bytes) => bytes.clone(),
            RequestBody::Text(text) | RequestBody::Xml(text) => Bytes::from(text.clone()),
            RequestBody::Json(value) => Bytes::from(value.to_string()),
            RequestBody::Form(fields) => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(fields)
                    .finish();
                Bytes::from(encoded)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RequestBody::Empty)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        RequestBody::Bytes(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Bytes(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for RequestBody {
    fn from(bytes: &'static [u8]) -> Self {
        RequestBody::Bytes(Bytes::from_static(bytes))
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(value: serde_json::Value) -> Self {
        RequestBody::Json(value)
    }
}

impl From<()> for RequestBody {
    fn from(_: ()) -> Self {
        RequestBody::Empty
    }
}
