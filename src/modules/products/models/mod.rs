pub mod product;

pub use product::{CreateProductRequest, Product, ProductVariant, VariantRequest};
