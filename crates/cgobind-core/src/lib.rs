//! C-declaration to Go cgo binding engine.
//!
//! Classifies the top-level declarations of a parsed header into function
//! and enum records, maps their C types onto Go types, and renders a Go
//! package that calls through to the native library.
//!
//! ## Modules
//!
//! - [`ident`]: declared names and typedef names
//! - [`sanitize`]: Go keyword escaping
//! - [`types`]: Go type, cast requirement and cgo type of a C type
//! - [`classify`]: declarations into [`Bindings`]
//! - [`naming`]: the [`Namer`] trait and its implementations
//! - [`emit`]: Go source for enums and functions
//! - [`generate`]: the end-to-end driver

pub mod classify;
pub mod emit;
pub mod error;
pub mod generate;
pub mod ident;
pub mod naming;
pub mod record;
pub mod sanitize;
pub mod types;

pub use classify::{classify, Bindings};
pub use emit::{emit_enum, emit_function, go_signature};
pub use error::{GenerateError, Result};
pub use generate::{collect, generate, write_module, GenerateOptions};
pub use naming::{DefaultNamer, Namer, PrefixNamer};
pub use record::{Enum, EnumMember, Function, Parameter};
pub use types::BindType;
