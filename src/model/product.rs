use serde::{Deserialize, Serialize};

/// A catalog item.
///
/// `id` is assigned by the store on insert and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
}

/// Client-writable product fields, used for both create and update bodies.
///
/// Any `id` in the body is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: f64, stock: i32) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            stock,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductQuery {
    /// Case-insensitive substring match on `name`. An empty needle matches every product.
    NameContains(String),
}
