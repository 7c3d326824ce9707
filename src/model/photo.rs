//! Embedded photo payloads attached to annotation points.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Raw encoded bytes of one attached photo (JPEG/PNG/... as captured).
///
/// Payloads are kept opaque until export time; decoding happens in the export
/// pipeline so that a corrupt photo degrades a single report slot instead of
/// the whole project. Snapshots serialize the bytes as plain base64; on
/// deserialization the browser-style `data:image/...;base64,` prefix found in
/// legacy snapshot files is also accepted and stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPayload(pub Vec<u8>);

impl PhotoPayload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for PhotoPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for PhotoPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        let trimmed = match encoded.strip_prefix("data:") {
            // Data URL: keep only the part after the first comma
            Some(_) => encoded
                .split_once(',')
                .map(|(_, payload)| payload)
                .ok_or_else(|| D::Error::custom("data URL without payload"))?,
            None => encoded.as_str(),
        };
        let bytes = STANDARD
            .decode(trimmed.trim())
            .map_err(|err| D::Error::custom(format!("invalid base64 photo payload: {err}")))?;
        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_plain_base64() {
        let payload = PhotoPayload::new(vec![1, 2, 3, 255]);
        let json = serde_json::to_string(&payload).unwrap();
        let back: PhotoPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn accepts_data_url_prefix() {
        let json = format!("\"data:image/jpeg;base64,{}\"", STANDARD.encode([9u8, 8, 7]));
        let payload: PhotoPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(payload.as_bytes(), &[9, 8, 7]);
    }

    #[test]
    fn rejects_garbage() {
        let result: Result<PhotoPayload, _> = serde_json::from_str("\"not base64!!\"");
        assert!(result.is_err());
    }
}
