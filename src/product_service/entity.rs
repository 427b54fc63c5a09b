//! Store mapping for [`Product`].

use crate::model::{Product, ProductDraft, ProductQuery};
use resource_store::{ResourceEntity, SqlEntity, StoreError};
use rusqlite::types::Value;
use rusqlite::Row;

impl ResourceEntity for Product {
    type Id = i64;
    type Draft = ProductDraft;
    type Query = ProductQuery;

    fn id(&self) -> i64 {
        self.id
    }

    fn revise(&self, draft: ProductDraft) -> Self {
        Self {
            id: self.id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            stock: draft.stock,
        }
    }
}

impl SqlEntity for Product {
    const TABLE: &'static str = "products";
    const COLUMNS: &'static [&'static str] = &["name", "description", "price", "stock"];
    const SCHEMA: &'static str = "CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT,
        price REAL NOT NULL,
        stock INTEGER NOT NULL
    );";

    fn from_row(row: &Row<'_>) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            price: row.get(3)?,
            stock: row.get(4)?,
        })
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            self.description.clone().into(),
            Value::Real(self.price),
            Value::Integer(self.stock.into()),
        ]
    }

    fn draft_values(draft: ProductDraft) -> Vec<Value> {
        vec![
            Value::Text(draft.name),
            draft.description.into(),
            Value::Real(draft.price),
            Value::Integer(draft.stock.into()),
        ]
    }

    fn filter(query: &ProductQuery) -> (&'static str, Vec<Value>) {
        match query {
            ProductQuery::NameContains(needle) => (
                "(?1 = '' OR instr(fold_case(name), fold_case(?1)) > 0)",
                vec![Value::Text(needle.clone())],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_store::{Repository, SqliteRepository};

    fn seeded() -> SqliteRepository<Product> {
        let mut repo = SqliteRepository::<Product>::in_memory().unwrap();
        repo.insert(ProductDraft::new("Laptop", 999.99, 5)).unwrap();
        repo.insert(ProductDraft::new("Laptop Stand", 49.5, 20).with_description("Aluminium"))
            .unwrap();
        repo.insert(ProductDraft::new("Mouse", 19.0, 100)).unwrap();
        repo
    }

    fn names(products: Vec<Product>) -> Vec<String> {
        products.into_iter().map(|p| p.name).collect()
    }

    #[test]
    fn search_is_a_case_insensitive_substring_match() {
        let mut repo = seeded();
        let hits = repo
            .query(&ProductQuery::NameContains("lap".into()))
            .unwrap();
        assert_eq!(names(hits), ["Laptop", "Laptop Stand"]);

        let hits = repo
            .query(&ProductQuery::NameContains("STAND".into()))
            .unwrap();
        assert_eq!(names(hits), ["Laptop Stand"]);
    }

    #[test]
    fn search_folds_non_ascii_letters() {
        let mut repo = seeded();
        repo.insert(ProductDraft::new("Éclair", 3.5, 12)).unwrap();
        repo.insert(ProductDraft::new("ÜBERGRÖSSE Mug", 9.0, 4)).unwrap();

        for needle in ["éclair", "ÉCLAIR", "Éclair"] {
            let hits = repo
                .query(&ProductQuery::NameContains(needle.into()))
                .unwrap();
            assert_eq!(names(hits), ["Éclair"], "needle {needle:?}");
        }

        let hits = repo
            .query(&ProductQuery::NameContains("übergrösse".into()))
            .unwrap();
        assert_eq!(names(hits), ["ÜBERGRÖSSE Mug"]);
    }

    #[test]
    fn empty_search_matches_everything() {
        let mut repo = seeded();
        let hits = repo.query(&ProductQuery::NameContains(String::new())).unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn optional_description_round_trips() {
        let mut repo = seeded();
        let all = repo.find_all().unwrap();
        assert_eq!(all[0].description, None);
        assert_eq!(all[1].description.as_deref(), Some("Aluminium"));
        assert_eq!(all[1].price, 49.5);
        assert_eq!(all[1].stock, 20);
    }

    #[test]
    fn revise_keeps_the_id() {
        let product = Product {
            id: 7,
            name: "Old".into(),
            description: Some("x".into()),
            price: 1.0,
            stock: 1,
        };
        let revised = product.revise(ProductDraft::new("New", 2.0, 3));
        assert_eq!(revised.id, 7);
        assert_eq!(revised.name, "New");
        assert_eq!(revised.description, None);
    }
}
