//! Core of compdoc: configuration, naming policy, and file resolution
//!
//! [`FileResolver`] maps a component name onto the three directory
//! conventions of the mirrored repository (sources, docs, samples).
//! [`DocumentationAssembler`] is the stable boundary the protocol layer
//! calls into. Every resolver operation returns an [`Outcome`].

pub mod assembler;
pub mod config;
pub mod description;
pub mod error;
pub mod models;
pub mod naming;
pub mod outcome;
pub mod resolver;

pub use assembler::DocumentationAssembler;
pub use config::{Config, ConfigLoader, ErrorMode, LayoutConfig, Overrides, SyncConfig};
pub use error::{Error, Result};
pub use models::{
    Component, ComponentDocumentation, ComponentFiles, DocumentFile, FileCategory, FileContent,
    FileContentRequest, FileDescriptor,
};
pub use naming::plural_name;
pub use outcome::Outcome;
pub use resolver::FileResolver;
