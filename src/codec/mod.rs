// Gateway module for codec - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod bytes_codec;
mod image_codec;
mod traits;

// Public re-exports - the ONLY way to access codec functionality
pub use bytes_codec::BytesCodec;
pub use image_codec::ImageCodec;
pub use traits::ResourceCodec;
