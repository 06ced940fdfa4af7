use tracing::info;

use crate::catalog::CatalogService;
use crate::domain::product::NewProduct;
use crate::errors::CatalogError;

const DEMO_PRODUCTS: &[(&str, &str, &str, f64, u64)] = &[
    ("Laptop", "Electronics", "15.6\" display", 50_000.0, 10),
    ("Mouse", "Electronics", "Wireless", 1_500.0, 25),
    ("Keyboard", "Electronics", "Mechanical", 3_000.0, 15),
    ("Monitor", "Electronics", "27\" 4K", 25_000.0, 8),
    ("Mug", "Kitchenware", "Ceramic", 500.0, 50),
    ("Kettle", "Kitchenware", "Electric", 2_000.0, 12),
    ("Book", "Books", "Science fiction", 600.0, 30),
    ("Pen", "Stationery", "Ballpoint", 50.0, 100),
    ("Notebook", "Stationery", "A5", 150.0, 40),
    ("Backpack", "Accessories", "Fits a laptop", 3_000.0, 7),
];

pub fn demo_products() -> Vec<NewProduct> {
    DEMO_PRODUCTS
        .iter()
        .map(|(name, category, description, price, stock)| NewProduct {
            name: (*name).to_string(),
            category: (*category).to_string(),
            description: (*description).to_string(),
            price: *price,
            stock: *stock,
        })
        .collect()
}

impl CatalogService {
    /// Inserts the demo assortment through the regular create path.
    pub async fn seed_demo(&self) -> Result<usize, CatalogError> {
        let products = demo_products();
        let count = products.len();
        for product in products {
            self.insert(product).await?;
        }

        info!(event_name = "catalog.seed.applied", product_count = count, "demo products seeded");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::catalog::ids::SequentialIdGenerator;
    use crate::catalog::CatalogService;

    #[tokio::test]
    async fn seed_demo_inserts_ten_products_in_order() {
        let service = CatalogService::new(Arc::new(SequentialIdGenerator::new("demo")));

        let count = service.seed_demo().await.expect("seed");
        let products = service.list().await;

        assert_eq!(count, 10);
        assert_eq!(products.len(), 10);
        assert_eq!(products[0].name, "Laptop");
        assert_eq!(products[0].id.as_str(), "demo-1");
        assert_eq!(products[9].name, "Backpack");
    }
}
