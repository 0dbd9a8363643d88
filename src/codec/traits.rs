use crate::utils::Result;

/// Turns fetched bytes into a resource and back.
///
/// The encoding written to disk does not have to match the bytes that came
/// off the network; it only has to decode to an equivalent resource.
pub trait ResourceCodec: Send + Sync + 'static {
    /// The decoded, in-memory form of a cached payload
    type Resource: Send + Sync + 'static;

    /// Decode raw bytes (network body or disk file) into a resource
    fn decode(&self, bytes: &[u8]) -> Result<Self::Resource>;

    /// Encode a resource for the disk tier
    fn encode(&self, resource: &Self::Resource) -> Result<Vec<u8>>;
}
