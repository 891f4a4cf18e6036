pub mod admin;
pub mod question;
