//! CBOR helpers shared by sealed values, proofs, and stored events.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::CoreError;

/// Serialize a value to CBOR bytes.
pub fn to_cbor<T: Serialize>(value: &T) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| CoreError::EncodingError(e.to_string()))?;
    Ok(buf)
}

/// Deserialize a value from CBOR bytes.
pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CoreError> {
    ciborium::from_reader(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_input_fails() {
        let bytes = to_cbor(&vec![1u32, 2, 3]).unwrap();
        let result: Result<Vec<u32>, _> = from_cbor(&bytes[..bytes.len() - 1]);
        assert!(matches!(result, Err(CoreError::DecodingError(_))));
    }
}
