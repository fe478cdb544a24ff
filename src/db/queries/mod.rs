//! Database queries

pub mod catalog;
pub mod recipe;
pub mod student;
pub mod upload;
