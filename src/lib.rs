pub mod models;
pub mod stages;
pub mod tools;
