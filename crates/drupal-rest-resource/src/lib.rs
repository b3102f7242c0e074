//! Node and user resources for drupal-rest.
//!
//! Thin request/response wrappers over the services endpoint's resource
//! collections. Each call is one HTTP request; nothing is cached and
//! nothing is retried.
//!
//! # Key types
//!
//! - [`Entity`]: what a collection holds (path and id type)
//! - [`Resource`]: get/query/save/delete against one collection
//! - [`NodeResource`], [`UserResource`]: the two collections the client uses
//! - [`ResourceConfig`]: listing settings (page size)

mod config;
mod entity;
mod error;
mod resource;

pub use config::ResourceConfig;
pub use entity::Entity;
pub use error::ResourceError;
pub use resource::{NodeResource, Resource, UserResource};
