//! Stored shapes of the user and recipe collections.

use mongodb::bson::{oid::ObjectId, Binary};
use serde::{Deserialize, Serialize};

/// Documents are loosely shaped, so every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "username", default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub birthday: Option<i32>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub size: Option<i32>,
    #[serde(default)]
    pub eye_color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NutritionDocument {
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nutrition: Option<NutritionDocument>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientDocument>,
    #[serde(default)]
    pub instructions: Option<String>,
    /// Raw image bytes (BSON binary).
    #[serde(default)]
    pub image: Option<Binary>,
}
