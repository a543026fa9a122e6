//! The dispatcher: both resource routers, the landing page and static files
//! on one [`Router`].

use std::sync::Arc;

use crate::api;
use crate::assets::Assets;
use crate::router::Router;
use crate::store::{Recipe, ShoppingListItem, Store, recipes, shopping_list};

/// The process-lifetime stores, created once at startup and shared with the
/// routers by `Arc`.
#[derive(Clone, Default)]
pub struct AppState {
    pub shopping_list: Arc<Store<ShoppingListItem>>,
    pub recipes: Arc<Store<Recipe>>,
}

impl AppState {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Stores pre-filled with the starter shopping list and recipes.
    pub fn seeded() -> Self {
        Self {
            shopping_list: Arc::new(Store::seeded(shopping_list::seed())),
            recipes: Arc::new(Store::seeded(recipes::seed())),
        }
    }
}

/// Mounts `/shopping-list`, `/recipes`, `/` and the static-file fallback.
pub fn router(state: &AppState, assets: Assets) -> Router {
    let assets = Arc::new(assets);
    Router::new()
        .get("/", assets.landing())
        .nest("/shopping-list", api::shopping_list::router(Arc::clone(&state.shopping_list)))
        .nest("/recipes", api::recipes::router(Arc::clone(&state.recipes)))
        .fallback(assets.fallback())
}
