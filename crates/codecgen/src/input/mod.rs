//! Type providers.
//!
//! Each provider turns some description of a package into [`Record`](crate::Record)s
//! and a [`TypeOracle`](crate::TypeOracle) for them.

mod memory;
#[cfg(feature = "input-go")]
mod go;
#[cfg(feature = "input-go")]
pub mod go_mod;

pub use memory::MemoryProvider;
#[cfg(feature = "input-go")]
pub use go::{GoPackage, LoadError};
