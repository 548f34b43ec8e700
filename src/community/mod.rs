pub mod community_dto;
pub mod community_handlers;
pub mod post_models;
pub mod post_repository;
