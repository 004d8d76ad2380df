//! Resolución genérica: inferencia de tipos y validación de restricciones.

pub mod constraints;
pub mod resolver;

pub use resolver::{GenericTypeResolver, TypedArguments};
