// HTTP API over the assistant and the ranker

pub mod handlers;
pub mod models;
pub mod routes;
