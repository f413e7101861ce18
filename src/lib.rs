// Library for tests to access modules

pub mod aggregation;
pub mod config;
pub mod dashboard;
pub mod feed;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod store;
