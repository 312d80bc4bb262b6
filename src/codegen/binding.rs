use crate::core::HandlerReference;

/// Render the expression the entry point uses to reference the handler.
///
/// Static handlers are referenced by their qualified name. Instance handlers are
/// bound to a freshly constructed object, which assumes the containing type has
/// a parameterless constructor.
pub fn resolve(handler: &HandlerReference, is_static: bool) -> String {
    if is_static {
        handler.qualified_name().to_string()
    } else {
        format!(
            "new {}().{}",
            handler.containing_type_name(),
            handler.short_method_name()
        )
    }
}
