//! `/recipes` — named recipes with an ordered ingredient list.

use std::sync::Arc;

use crate::router::Router;
use crate::store::{Recipe, Store};

/// Returns the router mounted at `/recipes`.
pub fn router(store: Arc<Store<Recipe>>) -> Router {
    super::resource(store)
}
