use super::errors::{ConvertError, Result};
use std::fmt;
use std::str::FromStr;

/// Dot-separated qualified name of a handler method
/// (`Namespace.Segments.Class.Method`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HandlerReference {
    qualified_name: String,
    split: usize,
}

impl HandlerReference {
    /// Parse a qualified handler name. At least a type and a method segment are
    /// required, and no segment may be empty.
    pub fn parse(input: &str) -> Result<Self> {
        let qualified_name = input.trim();
        if qualified_name.split('.').any(|segment| segment.trim().is_empty()) {
            return Err(ConvertError::user_input(format!(
                "Handler name '{qualified_name}' is not a valid qualified name (expected 'MyNamespace.MyClass.MyHandler')"
            )));
        }
        let split = qualified_name.rfind('.').ok_or_else(|| {
            ConvertError::user_input(format!(
                "Handler name '{qualified_name}' must include the containing type (expected 'MyNamespace.MyClass.MyHandler')"
            ))
        })?;
        Ok(Self {
            qualified_name: qualified_name.to_string(),
            split,
        })
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Last segment: the method identifier.
    pub fn short_method_name(&self) -> &str {
        &self.qualified_name[self.split + 1..]
    }

    /// Every segment but the last, rejoined with dots.
    pub fn containing_type_name(&self) -> &str {
        &self.qualified_name[..self.split]
    }
}

impl FromStr for HandlerReference {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for HandlerReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name)
    }
}

/// Call shape of a handler method as written in source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerSignature {
    /// Declared parameter types, source text, in declaration order
    pub parameter_types: Vec<String>,
    /// Declared return type, source text
    pub return_type: String,
    pub is_static: bool,
    pub is_void_return: bool,
    /// 1-based line of the declaration
    pub line: usize,
}

impl HandlerSignature {
    pub fn new(
        parameter_types: Vec<String>,
        return_type: impl Into<String>,
        is_static: bool,
    ) -> Self {
        let return_type = return_type.into();
        let is_void_return = return_type.eq_ignore_ascii_case("void");
        Self {
            parameter_types,
            return_type,
            is_static,
            is_void_return,
            line: 0,
        }
    }

    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_reference_segments() {
        let handler =
            HandlerReference::parse("LambdaToConvert.Function.MySampleLambdaHandler").unwrap();
        assert_eq!(handler.short_method_name(), "MySampleLambdaHandler");
        assert_eq!(handler.containing_type_name(), "LambdaToConvert.Function");
        assert_eq!(handler.to_string(), "LambdaToConvert.Function.MySampleLambdaHandler");
    }

    #[test]
    fn test_handler_reference_two_segments() {
        let handler: HandlerReference = "Function.Handle".parse().unwrap();
        assert_eq!(handler.short_method_name(), "Handle");
        assert_eq!(handler.containing_type_name(), "Function");
    }

    #[test]
    fn test_handler_reference_trims_whitespace() {
        let handler = HandlerReference::parse("  Ns.Cls.Method \n").unwrap();
        assert_eq!(handler.qualified_name(), "Ns.Cls.Method");
    }

    #[test]
    fn test_handler_reference_rejects_invalid_names() {
        for input in ["", "Method", "Ns..Method", ".Cls.Method", "Ns.Cls."] {
            let err = HandlerReference::parse(input).unwrap_err();
            assert!(matches!(err, ConvertError::UserInput { .. }), "{input:?}");
        }
    }

    #[test]
    fn test_signature_void_detection_is_case_insensitive() {
        assert!(HandlerSignature::new(vec![], "Void", true).is_void_return);
        assert!(!HandlerSignature::new(vec![], "Task", true).is_void_return);
    }
}
