//! Business logic services

pub mod csv_import;
