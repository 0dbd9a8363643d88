// Gateway module for network - follows the Train Station Pattern
// All external access must go through this gateway

mod http_fetcher;
mod traits;

pub use http_fetcher::HttpFetcher;
pub use traits::ByteFetcher;

#[cfg(test)]
pub use traits::MockByteFetcher;
