pub mod auth_service;
pub mod csv_import_service;
pub mod test_service;
