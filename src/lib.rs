// Export modules for library usage
pub mod analyzers;
pub mod cli;
pub mod codegen;
pub mod commands;
pub mod config;
pub mod core;
pub mod deploy;
pub mod formatting;
pub mod packages;
pub mod project;

// Re-export commonly used types
pub use crate::analyzers::SignatureAnalyzer;
pub use crate::codegen::{DelegateShape, EntryPointPlan, SerializationRegistrations};
pub use crate::commands::{convert, ConversionReport, ConversionRequest};
pub use crate::config::ConverterConfig;
pub use crate::core::{ConvertError, ErrorCode, HandlerReference, HandlerSignature, Result};
pub use crate::project::{ProjectDescriptor, PropertyChange};
