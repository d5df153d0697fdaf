// Products module: catalog with per-variant pricing and stock

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{CreateProductRequest, Product, ProductVariant, VariantRequest};
pub use repositories::{ProductRepository, ProductWrite};
pub use services::ProductService;
