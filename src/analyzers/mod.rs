//! Source analyzers used to locate and describe handler methods.

pub mod csharp;

pub use csharp::SignatureAnalyzer;
