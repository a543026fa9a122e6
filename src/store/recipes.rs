use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub ingredients: Vec<String>,
}

/// Client payload for creating or replacing a recipe. Both fields are required.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeDraft {
    pub name: String,
    pub ingredients: Vec<String>,
}

impl Record for Recipe {
    type Draft = RecipeDraft;

    const KIND: &'static str = "recipe";

    fn id(&self) -> Uuid {
        self.id
    }

    fn from_draft(id: Uuid, draft: RecipeDraft) -> Self {
        Self { id, name: draft.name, ingredients: draft.ingredients }
    }
}

fn draft(name: &str, ingredients: &[&str]) -> RecipeDraft {
    RecipeDraft {
        name: name.to_owned(),
        ingredients: ingredients.iter().map(|i| (*i).to_owned()).collect(),
    }
}

/// What the collection holds when the process starts.
pub fn seed() -> Vec<RecipeDraft> {
    vec![
        draft("boiled white rice", &["1 cup white rice", "2 cups water", "pinch of salt"]),
        draft("milkshake", &["2 tbsp cocoa", "2 cups vanilla ice cream", "1 cup milk"]),
    ]
}
