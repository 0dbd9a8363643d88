use std::sync::Arc;
use tokio::sync::watch;

use crate::catalog::Recipe;
use crate::utils::RecipeError;

/// Observable catalog state, written only by the coordinator
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    /// Last successfully fetched catalog, in endpoint order
    pub recipes: Vec<Recipe>,
    /// A refresh is in flight
    pub is_loading: bool,
    /// Failure of the most recent refresh, cleared by the next success
    pub error: Option<Arc<RecipeError>>,
}

/// What a call to `refresh_catalog` ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Catalog replaced with this many recipes
    Completed(usize),
    /// Fetch or parse failed; previous catalog kept
    Failed,
    /// Another refresh was already in flight
    Skipped,
}

/// Holds the in-flight flag for the lifetime of one refresh.
///
/// Released in `Drop`, so an error, a panic or the caller dropping the
/// refresh future all clear the flag.
pub(super) struct RefreshGuard<'a> {
    state: &'a watch::Sender<CatalogState>,
}

impl<'a> RefreshGuard<'a> {
    /// Set the flag if it is clear; `None` if a refresh already holds it
    pub(super) fn acquire(state: &'a watch::Sender<CatalogState>) -> Option<Self> {
        let acquired = state.send_if_modified(|s| {
            if s.is_loading {
                false
            } else {
                s.is_loading = true;
                true
            }
        });
        // Only build the guard on success; dropping one releases the flag
        if acquired {
            Some(Self { state })
        } else {
            None
        }
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| s.is_loading = false);
    }
}
