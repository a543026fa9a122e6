//! `/shopping-list` — items with a name and a checked flag.

use std::sync::Arc;

use crate::router::Router;
use crate::store::{ShoppingListItem, Store};

/// Returns the router mounted at `/shopping-list`.
pub fn router(store: Arc<Store<ShoppingListItem>>) -> Router {
    super::resource(store)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::api::tests::call;
    use crate::method::Method;
    use crate::store::shopping_list::seed;

    fn seeded() -> (Router, Arc<Store<ShoppingListItem>>) {
        let store = Arc::new(Store::seeded(seed()));
        (router(Arc::clone(&store)), store)
    }

    fn first_id(store: &Store<ShoppingListItem>) -> String {
        store.list()[0].id.to_string()
    }

    #[tokio::test]
    async fn get_lists_seeded_items_with_all_keys() {
        let (app, _) = seeded();
        let (status, body) = call(&app, Method::Get, "/", None).await;
        assert_eq!(status, 200);
        let items = body.as_array().unwrap();
        assert!(items.len() >= 3);
        for item in items {
            for key in ["id", "name", "checked"] {
                assert!(item.get(key).is_some(), "missing {key} in {item}");
            }
        }
    }

    #[tokio::test]
    async fn post_creates_item_with_new_id() {
        let (app, store) = seeded();
        let (status, body) =
            call(&app, Method::Post, "/", Some(json!({ "name": "coffee", "checked": false }))).await;
        assert_eq!(status, 201);
        let id = body["id"].as_str().unwrap().to_owned();
        assert_eq!(body, json!({ "id": id, "name": "coffee", "checked": false }));
        assert_eq!(store.len(), 4);
        assert_eq!(store.list()[3].id.to_string(), id);
    }

    #[tokio::test]
    async fn post_without_name_is_bad_request() {
        let (app, store) = seeded();
        let (status, body) = call(&app, Method::Post, "/", Some(json!({ "checked": true }))).await;
        assert_eq!(status, 400);
        assert!(body["error"].as_str().unwrap().contains("name"));
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn put_returns_the_submitted_item() {
        let (app, store) = seeded();
        let id = first_id(&store);
        let updated = json!({ "name": "foo", "checked": true, "id": id });
        let (status, body) = call(&app, Method::Put, &format!("/{id}"), Some(updated.clone())).await;
        assert_eq!(status, 200);
        assert_eq!(body, updated);
        assert_eq!(store.list()[0].name, "foo");
    }

    #[tokio::test]
    async fn put_with_mismatched_body_id_is_bad_request() {
        let (app, store) = seeded();
        let id = first_id(&store);
        let (status, _) = call(
            &app,
            Method::Put,
            &format!("/{id}"),
            Some(json!({ "name": "foo", "checked": true, "id": "someone-else" })),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(store.list()[0].name, "beans");
    }

    #[tokio::test]
    async fn delete_removes_then_reports_not_found() {
        let (app, store) = seeded();
        let id = first_id(&store);
        let path = format!("/{id}");

        let (status, body) = call(&app, Method::Delete, &path, None).await;
        assert_eq!((status, body), (204, Value::Null));
        assert_eq!(store.len(), 2);

        let (status, _) = call(&app, Method::Delete, &path, None).await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let (app, _) = seeded();
        let (status, body) = call(&app, Method::Delete, "/does-not-exist", None).await;
        assert_eq!(status, 404);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn patch_falls_through_to_not_found() {
        let (app, store) = seeded();
        let (status, _) = call(&app, Method::Patch, &format!("/{}", first_id(&store)), None).await;
        assert_eq!(status, 404);
    }
}
