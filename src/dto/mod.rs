pub mod auth_dto;
pub mod test_dto;
