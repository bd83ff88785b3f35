//! Wire payloads and the helpers that build them from form state.
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("not a data URL")]
    NotADataUrl,
    #[error("data URL has no payload separator")]
    MissingPayload,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid file name in data URL")]
    InvalidFileName,
    #[error("could not serialize JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Request body handed to an [`crate::api::ApiTransport`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    UrlEncoded(Vec<(String, String)>),
    Json(Value),
    Multipart(Vec<Part>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub value: PartValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartValue {
    Text(String),
    File {
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

impl Part {
    pub fn text(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: PartValue::Text(value.into()),
        }
    }

    pub fn file(name: &str, data: DataUrl) -> Self {
        Self {
            name: name.to_string(),
            value: PartValue::File {
                file_name: data.file_name.unwrap_or_else(|| name.to_string()),
                mime: data.mime,
                bytes: data.bytes,
            },
        }
    }
}

impl Payload {
    /// Value of a text field, for multipart and URL-encoded bodies.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        match self {
            Payload::Multipart(parts) => parts.iter().find_map(|p| match &p.value {
                PartValue::Text(v) if p.name == name => Some(v.as_str()),
                _ => None,
            }),
            Payload::UrlEncoded(pairs) => pairs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    /// File part by field name.
    pub fn file_part(&self, name: &str) -> Option<&PartValue> {
        match self {
            Payload::Multipart(parts) => parts
                .iter()
                .find(|p| p.name == name && matches!(p.value, PartValue::File { .. }))
                .map(|p| &p.value),
            _ => None,
        }
    }

    /// `application/x-www-form-urlencoded` serialization of a pair list.
    pub fn url_encoded_body(&self) -> Option<String> {
        match self {
            Payload::UrlEncoded(pairs) => Some(url_encode(pairs)),
            _ => None,
        }
    }
}

pub fn json_payload<T: Serialize>(body: &T) -> Result<Payload, EncodingError> {
    Ok(Payload::Json(serde_json::to_value(body)?))
}

/// Serialize pairs the way a browser `URLSearchParams` would.
pub fn url_encode(pairs: &[(String, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter())
        .finish()
}

/// Decoded `data:` URL as produced by the image widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Parse `data:<mime>[;name=<file>][;base64],<payload>` into raw bytes.
///
/// Payloads without the `base64` flag are percent-decoded.
pub fn parse_data_url(input: &str) -> Result<DataUrl, EncodingError> {
    let rest = input
        .trim()
        .strip_prefix("data:")
        .ok_or(EncodingError::NotADataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(EncodingError::MissingPayload)?;

    let mut params = header.split(';');
    let mime = params
        .next()
        .filter(|m| !m.is_empty())
        .unwrap_or("application/octet-stream")
        .to_string();

    let mut file_name = None;
    let mut is_base64 = false;
    for param in params {
        if param.eq_ignore_ascii_case("base64") {
            is_base64 = true;
        } else if let Some(name) = param.strip_prefix("name=") {
            let decoded =
                urlencoding::decode(name).map_err(|_| EncodingError::InvalidFileName)?;
            file_name = Some(decoded.into_owned());
        }
    }

    let bytes = if is_base64 {
        STANDARD.decode(payload.trim())?
    } else {
        urlencoding::decode_binary(payload.as_bytes()).into_owned()
    };

    Ok(DataUrl {
        mime,
        file_name,
        bytes,
    })
}

/// Build a `data:` URL carrying the file name, the inverse of [`parse_data_url`].
pub fn to_data_url(mime: &str, file_name: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};name={};base64,{}",
        mime,
        urlencoding::encode(file_name),
        STANDARD.encode(bytes)
    )
}
