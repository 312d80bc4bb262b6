//! Delegate shape and serialization registrations derived from a handler signature.

use crate::core::HandlerSignature;
use std::fmt;

/// Handlers with exactly this many parameters take the invocation context as
/// their second argument. Only the first parameter needs a serializer entry.
pub const CONTEXT_PARAMETER_ARITY: usize = 2;

/// Return types, compared case-insensitively, that are awaitable wrappers with
/// nothing to serialize.
pub const AWAITABLE_WRAPPERS: &[&str] = &["task", "valuetask"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelegateKind {
    /// Void-returning
    Action,
    /// Value-returning
    Func,
}

/// Generic delegate type used to bind the handler, e.g. `Func<string,ILambdaContext,string>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelegateShape {
    pub kind: DelegateKind,
    pub parameter_types: Vec<String>,
    /// Present only for [`DelegateKind::Func`]
    pub return_type: Option<String>,
}

impl DelegateShape {
    fn type_arguments(&self) -> impl Iterator<Item = &str> {
        self.parameter_types
            .iter()
            .chain(self.return_type.iter())
            .map(String::as_str)
    }
}

impl fmt::Display for DelegateShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.kind {
            DelegateKind::Action => "Action",
            DelegateKind::Func => "Func",
        };
        let arguments = self.type_arguments().collect::<Vec<_>>();
        if arguments.is_empty() {
            // Only a parameterless Action gets here.
            f.write_str(name)
        } else {
            write!(f, "{name}<{}>", arguments.join(","))
        }
    }
}

/// Types that need a generated serialization-context entry, in emission order.
/// Repeated types are kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SerializationRegistrations(Vec<String>);

impl SerializationRegistrations {
    pub fn types(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<String>> for SerializationRegistrations {
    fn from(types: Vec<String>) -> Self {
        Self(types)
    }
}

pub fn is_awaitable_wrapper(type_text: &str) -> bool {
    AWAITABLE_WRAPPERS
        .iter()
        .any(|marker| type_text.eq_ignore_ascii_case(marker))
}

/// Derive the delegate shape and the serialization registrations for a handler.
pub fn resolve(signature: &HandlerSignature) -> (DelegateShape, SerializationRegistrations) {
    let shape = if signature.is_void_return {
        DelegateShape {
            kind: DelegateKind::Action,
            parameter_types: signature.parameter_types.clone(),
            return_type: None,
        }
    } else {
        DelegateShape {
            kind: DelegateKind::Func,
            parameter_types: signature.parameter_types.clone(),
            return_type: Some(signature.return_type.clone()),
        }
    };
    (shape, registrations_for(signature))
}

fn registrations_for(signature: &HandlerSignature) -> SerializationRegistrations {
    let params = &signature.parameter_types;
    let mut types: Vec<String> = if params.len() == CONTEXT_PARAMETER_ARITY {
        params[..1].to_vec()
    } else {
        params.clone()
    };
    if !signature.is_void_return && !is_awaitable_wrapper(&signature.return_type) {
        types.push(signature.return_type.clone());
    }
    SerializationRegistrations(types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn signature(params: &[&str], returns: &str) -> HandlerSignature {
        HandlerSignature::new(params.iter().map(|p| p.to_string()).collect(), returns, false)
    }

    fn derive(params: &[&str], returns: &str) -> (String, Vec<String>) {
        let (shape, registrations) = resolve(&signature(params, returns));
        (shape.to_string(), registrations.types().to_vec())
    }

    #[test]
    fn test_void_handler_is_action() {
        assert_eq!(derive(&["Evt"], "void"), ("Action<Evt>".into(), vec!["Evt".into()]));
    }

    #[test]
    fn test_context_parameter_is_not_registered() {
        assert_eq!(
            derive(&["string", "Context"], "string"),
            (
                "Func<string,Context,string>".into(),
                vec!["string".into(), "string".into()]
            )
        );
    }

    #[test]
    fn test_task_return_is_not_registered() {
        assert_eq!(derive(&["Evt"], "Task"), ("Func<Evt,Task>".into(), vec!["Evt".into()]));
        assert_eq!(derive(&["Evt"], "ValueTask").1, vec!["Evt".to_string()]);
        assert_eq!(derive(&["Evt"], "task").1, vec!["Evt".to_string()]);
    }

    #[test]
    fn test_generic_task_is_registered_verbatim() {
        let (shape, registrations) = derive(&["Evt", "ILambdaContext"], "Task<Reply>");
        assert_eq!(shape, "Func<Evt,ILambdaContext,Task<Reply>>");
        assert_eq!(registrations, vec!["Evt".to_string(), "Task<Reply>".to_string()]);
    }

    #[test]
    fn test_other_arities_register_every_parameter() {
        let (shape, registrations) = derive(&["A", "B", "C"], "void");
        assert_eq!(shape, "Action<A,B,C>");
        assert_eq!(registrations, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_repeated_types_are_not_deduplicated() {
        let (_, registrations) = derive(&["Evt"], "Evt");
        assert_eq!(registrations, vec!["Evt", "Evt"]);
    }

    #[test]
    fn test_type_text_is_not_reformatted() {
        let (shape, _) = derive(&["Dictionary<string, int>"], "void");
        assert_eq!(shape, "Action<Dictionary<string, int>>");
    }

    #[test]
    fn test_parameterless_handlers() {
        assert_eq!(derive(&[], "void"), ("Action".into(), vec![]));
        assert_eq!(derive(&[], "string"), ("Func<string>".into(), vec!["string".into()]));
    }
}
