use crate::error::{ArtError, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;

/// A `data:<mime>;base64,<payload>` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    mime_type: String,
    data: String,
}

impl DataUri {
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| ArtError::RequestError("Expected a data URI".into()))?;

        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| ArtError::RequestError("Data URI has no payload".into()))?;

        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| ArtError::RequestError("Data URI must use base64 encoding".into()))?;

        if mime_type.is_empty() {
            return Err(ArtError::RequestError("Data URI is missing a MIME type".into()));
        }
        if data.is_empty() {
            return Err(ArtError::RequestError("Data URI payload is empty".into()));
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    pub fn from_parts(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::from_parts(mime_type, STANDARD.encode(bytes))
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 payload, still encoded.
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| ArtError::SerializationError(format!("Invalid base64 payload: {}", e)))
    }

    /// File extension matching the MIME subtype, `bin` when unknown.
    pub fn extension(&self) -> &str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "bin",
        }
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}
