pub mod auth_repository;
pub mod secure_storage;
