use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub id: Uuid,
    pub name: String,
    pub checked: bool,
}

/// Client payload for creating or replacing a shopping list item.
/// `checked` defaults to `false` when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct ShoppingListDraft {
    pub name: String,
    #[serde(default)]
    pub checked: bool,
}

impl Record for ShoppingListItem {
    type Draft = ShoppingListDraft;

    const KIND: &'static str = "shopping list item";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_draft(id: Uuid, draft: ShoppingListDraft) -> Self {
        Self { id, name: draft.name, checked: draft.checked }
    }
}

/// What the list holds when the process starts.
pub fn seed() -> Vec<ShoppingListDraft> {
    ["beans", "tomatoes", "peppers"]
        .into_iter()
        .map(|name| ShoppingListDraft { name: name.to_owned(), checked: false })
        .collect()
}
