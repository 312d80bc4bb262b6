pub mod convert;

pub use convert::{convert, ConversionReport, ConversionRequest, Notice, NoticeLevel};
