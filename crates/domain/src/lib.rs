//! Domain layer for Locus
//!
//! Contains the location value objects and domain errors.
//! This layer has no knowledge of providers or geocoders and defines the
//! ubiquitous language shared by the other crates.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::*;
