pub mod analyze;
pub mod catalog_route;
pub mod health_route;
pub mod report;
