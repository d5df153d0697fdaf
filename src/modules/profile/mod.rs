pub mod controllers;
pub mod models;
pub mod repositories;
