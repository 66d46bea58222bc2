//! Column type descriptors
//!
//! This crate handles:
//! - The read/write type contract of each column type
//! - Built-in descriptors for the standard column types
//! - Descriptors derived from custom type handler signatures
//! - The registry the rule resolves column types against

pub mod builtin;
pub mod descriptor;
pub mod reflection;
pub mod registry;

pub use descriptor::{StaticDescriptor, TypeDescriptor};
pub use reflection::{ReflectionDescriptor, TypeHandlerSignature};
pub use registry::{DescriptorRegistry, RegistryError, UnregisteredTypeError};
