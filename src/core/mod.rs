//! Core configuration types: values, the memory store and the hierarchy.

mod builder;
mod hierarchy;
mod store;
mod value;

pub use builder::HierarchyBuilder;
pub use hierarchy::Hierarchy;
pub use store::MemoryStore;
pub use value::{Value, ValueMap};
