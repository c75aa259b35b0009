//! Server module for building HTTP servers from resource controllers
//!
//! `ServerBuilder` registers:
//! - CRUD routes for every resource controller
//! - Health routes
//! - Any custom routes

pub mod builder;
pub mod handlers;
pub mod resource_registry;

pub use builder::ServerBuilder;
pub use resource_registry::{ResourceDescriptor, ResourceRegistry};
