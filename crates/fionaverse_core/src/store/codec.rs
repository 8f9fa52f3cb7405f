//! Typed value ⇄ stored text conversion.
//!
//! # Invariants
//! - `decode(encode(v)) == v` for every JSON-representable `v`.
//! - Structural checks (field presence, enum membership, closed id sets)
//!   happen during decode through the value's `Deserialize` impl.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// The value could not be turned into stored text.
#[derive(Debug)]
pub struct EncodeError(serde_json::Error);

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to encode value: {}", self.0)
    }
}

impl Error for EncodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// Stored text does not parse to the expected shape.
#[derive(Debug)]
pub struct DecodeError(serde_json::Error);

impl DecodeError {
    /// Line and column of the first offending character.
    pub fn position(&self) -> (usize, usize) {
        (self.0.line(), self.0.column())
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to decode stored value: {}", self.0)
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// Encode/decode pair used by slots.
pub trait Codec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, EncodeError>;
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, DecodeError>;
}

/// Compact JSON, byte-compatible with what a browser's `JSON.stringify`
/// stores for the same shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, EncodeError> {
        serde_json::to_string(value).map_err(EncodeError)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, DecodeError> {
        serde_json::from_str(text).map_err(DecodeError)
    }
}

#[cfg(test)]
mod tests {
    use super::{Codec, JsonCodec};
    use serde::{Deserialize, Serialize};
    use std::collections::{BTreeMap, HashMap};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Nested {
        name: String,
        score: i64,
        ratio: f64,
        flags: Vec<bool>,
        extra: Option<String>,
        by_key: BTreeMap<String, Vec<u32>>,
    }

    #[test]
    fn nested_value_roundtrips() {
        let value = Nested {
            name: "Fiona ✨".to_string(),
            score: -42,
            ratio: 0.25,
            flags: vec![true, false],
            extra: None,
            by_key: BTreeMap::from([("a".to_string(), vec![1, 2]), ("b".to_string(), vec![])]),
        };

        let text = JsonCodec.encode(&value).unwrap();
        let decoded: Nested = JsonCodec.decode(&text).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn string_matches_browser_json() {
        assert_eq!(JsonCodec.encode(&"dark").unwrap(), "\"dark\"");
        assert_eq!(
            JsonCodec.encode(&vec!["a", "b"]).unwrap(),
            "[\"a\",\"b\"]"
        );
    }

    #[test]
    fn non_string_map_keys_fail_to_encode() {
        let value: HashMap<Vec<u8>, u8> = HashMap::from([(vec![1], 1)]);
        let err = JsonCodec.encode(&value).unwrap_err();
        assert!(err.to_string().contains("failed to encode"));
    }

    #[test]
    fn malformed_text_fails_to_decode() {
        let err = JsonCodec.decode::<Vec<String>>("[\"a\",").unwrap_err();
        assert_eq!(err.position().0, 1);
        assert!(JsonCodec.decode::<u32>("\"not a number\"").is_err());
    }
}
