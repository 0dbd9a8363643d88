use bytes::Bytes;

use super::traits::ResourceCodec;
use crate::utils::{RecipeError, Result};

/// Identity codec for raw payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesCodec;

impl ResourceCodec for BytesCodec {
    type Resource = Bytes;

    fn decode(&self, bytes: &[u8]) -> Result<Bytes> {
        if bytes.is_empty() {
            return Err(RecipeError::Decode("empty payload".to_string()));
        }
        Ok(Bytes::copy_from_slice(bytes))
    }

    fn encode(&self, resource: &Bytes) -> Result<Vec<u8>> {
        if resource.is_empty() {
            return Err(RecipeError::Encode("empty payload".to_string()));
        }
        Ok(resource.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let codec = BytesCodec;
        let decoded = codec.decode(b"abc").unwrap();
        assert_eq!(&decoded[..], b"abc");
        assert_eq!(codec.encode(&decoded).unwrap(), b"abc".to_vec());
    }

    #[test]
    fn test_empty_is_rejected() {
        assert!(BytesCodec.decode(b"").is_err());
        assert!(BytesCodec.encode(&Bytes::new()).is_err());
    }
}
