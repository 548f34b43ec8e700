pub mod mood_dto;
pub mod mood_handlers;
pub mod mood_models;
pub mod mood_repository;
