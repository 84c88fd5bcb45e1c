//! GraphQL output types. Passwords have no field here and cannot be queried.

use async_graphql::{SimpleObject, ID};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::documents::{IngredientDocument, NutritionDocument, RecipeDocument, UserDocument};

#[derive(Debug, Clone, SimpleObject)]
pub struct User {
    pub id: Option<ID>,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub size: Option<i32>,
    pub eye_color: Option<String>,
    pub birthday: Option<i32>,
    pub weight: Option<String>,
    pub height: Option<String>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct Nutrition {
    pub fat: f64,
    pub protein: f64,
    pub carbs: f64,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct Ingredient {
    pub name: Option<String>,
    pub nutrition: Option<Nutrition>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct Recipe {
    pub id: Option<ID>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Option<String>,
    /// Base64 (standard alphabet) of the stored image bytes
    pub image: Option<String>,
}

impl From<UserDocument> for User {
    fn from(d: UserDocument) -> Self {
        Self {
            id: d.id.map(|oid| ID(oid.to_hex())),
            name: d.name,
            age: d.age,
            size: d.size,
            eye_color: d.eye_color,
            birthday: d.birthday,
            weight: d.weight,
            height: d.height,
        }
    }
}

impl From<NutritionDocument> for Nutrition {
    fn from(d: NutritionDocument) -> Self {
        Self { fat: d.fat, protein: d.protein, carbs: d.carbs }
    }
}

impl From<IngredientDocument> for Ingredient {
    fn from(d: IngredientDocument) -> Self {
        Self { name: d.name, nutrition: d.nutrition.map(Into::into), category: d.category }
    }
}

impl From<RecipeDocument> for Recipe {
    fn from(d: RecipeDocument) -> Self {
        Self {
            id: d.id.map(|oid| ID(oid.to_hex())),
            name: d.name,
            description: d.description,
            ingredients: d.ingredients.into_iter().map(Into::into).collect(),
            instructions: d.instructions,
            image: d.image.map(|b| STANDARD.encode(b.bytes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{spec::BinarySubtype, Binary};

    #[test]
    fn recipe_image_is_base64() {
        let doc = RecipeDocument {
            image: Some(Binary { subtype: BinarySubtype::Generic, bytes: b"png".to_vec() }),
            ..Default::default()
        };
        assert_eq!(Recipe::from(doc).image.as_deref(), Some("cG5n"));
    }

    #[test]
    fn stored_username_becomes_name() {
        let user = User::from(UserDocument {
            name: Some("tobi".into()),
            password: Some("secret".into()),
            ..Default::default()
        });
        assert_eq!(user.name.as_deref(), Some("tobi"));
    }
}
