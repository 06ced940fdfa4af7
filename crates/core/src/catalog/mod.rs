pub mod ids;
pub mod input;
pub mod seed;

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::product::{NewProduct, Product, ProductId};
use crate::errors::CatalogError;

use self::ids::IdGenerator;
use self::input::ProductInput;

/// Upper bound on id draws per create before giving up.
pub const MAX_ID_ATTEMPTS: usize = 16;

/// Ordered product collection. Lookups are linear scans.
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    pub fn find_mut(&mut self, product_id: &ProductId) -> Option<&mut Product> {
        self.products.iter_mut().find(|product| &product.id == product_id)
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.find(product_id).is_some()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Callers guarantee the id is not already stored.
    fn push(&mut self, product: Product) {
        self.products.push(product);
    }

    fn remove(&mut self, product_id: &ProductId) -> Option<Product> {
        let index = self.products.iter().position(|product| &product.id == product_id)?;
        Some(self.products.remove(index))
    }
}

/// Owns the catalog and serialises every mutation behind one lock.
pub struct CatalogService {
    catalog: RwLock<Catalog>,
    ids: Arc<dyn IdGenerator>,
}

impl CatalogService {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { catalog: RwLock::new(Catalog::default()), ids }
    }

    pub async fn create(&self, input: ProductInput) -> Result<Product, CatalogError> {
        let draft = input.into_new_product()?;
        self.insert(draft).await
    }

    pub async fn insert(&self, draft: NewProduct) -> Result<Product, CatalogError> {
        let mut catalog = self.catalog.write().await;
        let id = self.allocate_id(&catalog)?;
        let product = draft.into_product(id);
        catalog.push(product.clone());

        info!(
            event_name = "catalog.product.created",
            product_id = %product.id,
            catalog_size = catalog.len(),
            "product created"
        );
        Ok(product)
    }

    pub async fn list(&self) -> Vec<Product> {
        self.catalog.read().await.products().to_vec()
    }

    pub async fn get(&self, product_id: &ProductId) -> Result<Product, CatalogError> {
        let catalog = self.catalog.read().await;
        catalog.find(product_id).cloned().ok_or_else(|| CatalogError::NotFound(product_id.clone()))
    }

    pub async fn update(
        &self,
        product_id: &ProductId,
        input: ProductInput,
    ) -> Result<Product, CatalogError> {
        let mut catalog = self.catalog.write().await;
        let product = catalog
            .find_mut(product_id)
            .ok_or_else(|| CatalogError::NotFound(product_id.clone()))?;

        let patch = input.into_patch()?;
        patch.apply(product);

        info!(event_name = "catalog.product.updated", product_id = %product_id, "product updated");
        Ok(product.clone())
    }

    pub async fn delete(&self, product_id: &ProductId) -> Result<(), CatalogError> {
        let mut catalog = self.catalog.write().await;
        catalog.remove(product_id).ok_or_else(|| CatalogError::NotFound(product_id.clone()))?;

        info!(
            event_name = "catalog.product.deleted",
            product_id = %product_id,
            catalog_size = catalog.len(),
            "product deleted"
        );
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.catalog.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.catalog.read().await.is_empty()
    }

    fn allocate_id(&self, catalog: &Catalog) -> Result<ProductId, CatalogError> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let candidate = self.ids.next_id();
            if !catalog.contains(&candidate) {
                return Ok(candidate);
            }
            debug!(
                event_name = "catalog.id.collision",
                product_id = %candidate,
                attempt,
                "generated id already in use, drawing again"
            );
        }

        warn!(
            event_name = "catalog.id.exhausted",
            attempts = MAX_ID_ATTEMPTS,
            "id generator kept producing ids that are already in use"
        );
        Err(CatalogError::IdExhausted { attempts: MAX_ID_ATTEMPTS })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::ids::{IdGenerator, SequentialIdGenerator};
    use super::input::ProductInput;
    use super::{CatalogService, MAX_ID_ATTEMPTS};
    use crate::domain::product::ProductId;
    use crate::errors::CatalogError;

    /// Hands out a scripted list of ids, repeating the last one forever.
    struct ScriptedIds(Mutex<Vec<&'static str>>);

    impl IdGenerator for ScriptedIds {
        fn next_id(&self) -> ProductId {
            let mut script = self.0.lock().expect("script lock");
            let next = if script.len() > 1 { script.remove(0) } else { script[0] };
            ProductId::from(next)
        }
    }

    fn service() -> CatalogService {
        CatalogService::new(Arc::new(SequentialIdGenerator::default()))
    }

    fn input(value: serde_json::Value) -> ProductInput {
        ProductInput::from_json(value).expect("object payload")
    }

    fn product_json(name: &str) -> serde_json::Value {
        json!({
            "name": name,
            "category": "Office",
            "description": "Blue ink",
            "price": 50,
            "stock": 100
        })
    }

    #[tokio::test]
    async fn create_assigns_unique_ids_and_list_preserves_order() {
        let service = service();
        let mut ids = HashSet::new();

        for name in ["Pen", "Pencil", "Marker"] {
            let created = service.create(input(product_json(name))).await.expect("create");
            assert!(ids.insert(created.id));
        }

        let names: Vec<_> = service.list().await.into_iter().map(|product| product.name).collect();
        assert_eq!(names, vec!["Pen", "Pencil", "Marker"]);
    }

    #[tokio::test]
    async fn get_returns_what_create_stored() {
        let service = service();
        let created = service.create(input(product_json("Pen"))).await.expect("create");

        assert_eq!(service.get(&created.id).await, Ok(created));
    }

    #[tokio::test]
    async fn update_changes_only_requested_fields() {
        let service = service();
        let created = service.create(input(product_json("Pen"))).await.expect("create");

        let updated =
            service.update(&created.id, input(json!({ "price": 999 }))).await.expect("update");

        assert_eq!(updated.price, 999.0);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.category, created.category);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.stock, created.stock);
        assert_eq!(updated.id, created.id);
        assert_eq!(service.get(&created.id).await, Ok(updated));
    }

    #[tokio::test]
    async fn rejected_update_leaves_product_untouched() {
        let service = service();
        let created = service.create(input(product_json("Pen"))).await.expect("create");

        let result =
            service.update(&created.id, input(json!({ "name": "Quill", "price": "free" }))).await;

        assert_eq!(result, Err(CatalogError::validation("price must be a non-negative number")));
        assert_eq!(service.get(&created.id).await, Ok(created));
    }

    #[tokio::test]
    async fn update_reports_missing_product_before_payload_problems() {
        let service = service();

        let result = service.update(&ProductId::from("ghost"), input(json!({}))).await;

        assert_eq!(result, Err(CatalogError::NotFound(ProductId::from("ghost"))));
    }

    #[tokio::test]
    async fn empty_update_is_a_validation_error() {
        let service = service();
        let created = service.create(input(product_json("Pen"))).await.expect("create");

        let result = service.update(&created.id, input(json!({}))).await;

        assert_eq!(result, Err(CatalogError::validation("no fields to update")));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let service = service();
        let created = service.create(input(product_json("Pen"))).await.expect("create");

        service.delete(&created.id).await.expect("delete");

        assert_eq!(service.get(&created.id).await, Err(CatalogError::NotFound(created.id)));
        assert!(service.is_empty().await);
    }

    #[tokio::test]
    async fn deleting_unknown_id_leaves_catalog_unchanged() {
        let service = service();
        service.create(input(product_json("Pen"))).await.expect("create");
        service.create(input(product_json("Pencil"))).await.expect("create");
        let before = service.list().await;

        let result = service.delete(&ProductId::from("missing")).await;

        assert_eq!(result, Err(CatalogError::NotFound(ProductId::from("missing"))));
        assert_eq!(service.list().await, before);
    }

    #[tokio::test]
    async fn delete_keeps_relative_order_of_remaining_products() {
        let service = service();
        let mut created = Vec::new();
        for name in ["A", "B", "C"] {
            created.push(service.create(input(product_json(name))).await.expect("create"));
        }

        service.delete(&created[1].id).await.expect("delete middle");

        let names: Vec<_> = service.list().await.into_iter().map(|product| product.name).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn invalid_create_does_not_grow_catalog() {
        let service = service();

        let blank = service.create(input(product_json(""))).await;
        let mut missing = product_json("Pen");
        if let Some(fields) = missing.as_object_mut() {
            fields.remove("name");
        }
        let omitted = service.create(input(missing)).await;

        assert!(matches!(blank, Err(CatalogError::Validation(_))));
        assert!(matches!(omitted, Err(CatalogError::Validation(_))));
        assert_eq!(service.len().await, 0);
    }

    #[tokio::test]
    async fn colliding_ids_are_drawn_again() {
        let service =
            CatalogService::new(Arc::new(ScriptedIds(Mutex::new(vec!["dup", "dup", "fresh"]))));

        let first = service.create(input(product_json("Pen"))).await.expect("first create");
        let second = service.create(input(product_json("Pencil"))).await.expect("second create");

        assert_eq!(first.id.as_str(), "dup");
        assert_eq!(second.id.as_str(), "fresh");
    }

    #[tokio::test]
    async fn persistent_collisions_exhaust_attempts() {
        let service = CatalogService::new(Arc::new(ScriptedIds(Mutex::new(vec!["same"]))));
        service.create(input(product_json("Pen"))).await.expect("first create");

        let result = service.create(input(product_json("Pencil"))).await;

        assert_eq!(result, Err(CatalogError::IdExhausted { attempts: MAX_ID_ATTEMPTS }));
        assert_eq!(service.len().await, 1);
    }

    #[tokio::test]
    async fn pen_lifecycle_end_to_end() {
        let service = service();

        let created = service
            .create(input(json!({
                "name": "Pen",
                "category": "Office",
                "description": "Blue ink",
                "price": 50,
                "stock": 100
            })))
            .await
            .expect("create pen");
        assert!(!created.id.as_str().is_empty());
        assert_eq!(service.list().await.len(), 1);

        let updated =
            service.update(&created.id, input(json!({ "stock": 90 }))).await.expect("update");
        assert_eq!(updated.stock, 90);
        assert_eq!(updated.name, "Pen");

        service.delete(&created.id).await.expect("delete pen");
        assert!(service.list().await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_never_share_an_id() {
        let service = Arc::new(service());
        let mut handles = Vec::new();
        for index in 0..32 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.create(input(product_json(&format!("Item {index}")))).await
            }));
        }
        for handle in handles {
            handle.await.expect("join").expect("create");
        }

        let ids: HashSet<_> = service.list().await.into_iter().map(|product| product.id).collect();
        assert_eq!(ids.len(), 32);
    }
}
