// Gateway module for coordinator - follows the Train Station Pattern
// All external access must go through this gateway

mod fetch_coordinator;
mod state;

pub use fetch_coordinator::FetchCoordinator;
pub use state::{CatalogState, RefreshOutcome};
