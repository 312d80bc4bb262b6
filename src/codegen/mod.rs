//! C# entry-point generation for converted handlers
//!
//! A handler signature flows through three pure steps before anything touches
//! the disk: [`delegate::resolve`] derives the delegate type and serializer
//! registrations, [`binding::resolve`] renders the handler reference, and
//! [`entry_point::render`] fills the adapter template.

pub mod binding;
pub mod delegate;
pub mod entry_point;

pub use delegate::{
    DelegateKind, DelegateShape, SerializationRegistrations, AWAITABLE_WRAPPERS,
    CONTEXT_PARAMETER_ARITY,
};
pub use entry_point::{ENTRY_POINT_FILE_NAME, SERIALIZER_CONTEXT_NAME};

use crate::core::{HandlerReference, HandlerSignature, Result};
use std::path::{Path, PathBuf};

/// Everything needed to write `EntryPoint.cs` for one handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryPointPlan {
    pub shape: DelegateShape,
    pub binding: String,
    pub registrations: SerializationRegistrations,
}

impl EntryPointPlan {
    pub fn new(handler: &HandlerReference, signature: &HandlerSignature) -> Self {
        let (shape, registrations) = delegate::resolve(signature);
        Self {
            shape,
            binding: binding::resolve(handler, signature.is_static),
            registrations,
        }
    }

    pub fn emit(&self, output_dir: &Path) -> Result<PathBuf> {
        entry_point::emit(&self.shape, &self.binding, &self.registrations, output_dir)
    }
}
