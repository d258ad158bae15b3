use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::OnboardingError;

/// Identity of a document within its case; survives reordering and edits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentKey(pub String);

impl DocumentKey {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The binary attached to a document. Content travels base64-encoded; its
/// format is whatever the data source accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentArtifact {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub size_bytes: u64,
    pub content_b64: String,
}

impl DocumentArtifact {
    pub fn from_bytes(filename: impl Into<String>, mime_type: Option<String>, bytes: &[u8]) -> Self {
        Self {
            filename: filename.into(),
            mime_type,
            size_bytes: bytes.len() as u64,
            content_b64: STANDARD.encode(bytes),
        }
    }

    pub fn bytes(&self) -> Result<Vec<u8>, OnboardingError> {
        let bytes = STANDARD
            .decode(&self.content_b64)
            .map_err(|err| OnboardingError::InvalidArtifact(err.to_string()))?;
        if bytes.len() as u64 != self.size_bytes {
            return Err(OnboardingError::InvalidArtifact(format!(
                "expected {} bytes, decoded {}",
                self.size_bytes,
                bytes.len()
            )));
        }
        Ok(bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub key: DocumentKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub document_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<DocumentArtifact>,
}

/// Input for attaching a document; a key is generated when none is given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewDocument {
    pub key: Option<DocumentKey>,
    pub name: Option<String>,
    pub document_type: String,
    pub file: Option<DocumentArtifact>,
}

impl NewDocument {
    pub fn of_type(document_type: impl Into<String>) -> Self {
        Self {
            document_type: document_type.into(),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<DocumentKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_file(mut self, file: DocumentArtifact) -> Self {
        self.file = Some(file);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_content_decodes_to_original_bytes() {
        let artifact = DocumentArtifact::from_bytes("lca.pdf", Some("application/pdf".into()), b"%PDF-1.7");
        assert_eq!(artifact.size_bytes, 8);
        assert_eq!(artifact.bytes().expect("decode"), b"%PDF-1.7");
    }

    #[test]
    fn artifact_with_wrong_size_is_rejected() {
        let mut artifact = DocumentArtifact::from_bytes("i9.png", None, b"abc");
        artifact.size_bytes = 10;
        assert!(matches!(
            artifact.bytes(),
            Err(OnboardingError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn generated_keys_differ() {
        assert_ne!(DocumentKey::generate(), DocumentKey::generate());
    }
}
