pub mod auth;
pub mod health;
pub mod openapi;
pub mod test_routes;
