pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;

pub use catalog::ids::{IdGenerator, NanoIdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use catalog::input::ProductInput;
pub use catalog::{Catalog, CatalogService};
pub use domain::product::{NewProduct, Product, ProductId, ProductPatch};
pub use errors::{ApplicationError, CatalogError, InterfaceError, INTERNAL_ERROR_MESSAGE};
