//! Tree-sitter based handler lookup for C# sources
//!
//! Only enough structure is inspected to find `method_declaration` nodes and read
//! their modifiers, return type text and parameter type text. Names are matched
//! on the short method identifier alone, so two methods with the same name in
//! different classes of one file resolve to the first in document order.

use crate::core::{ConvertError, HandlerReference, HandlerSignature, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use tree_sitter::{Node, Parser, Tree};

const METHOD_DECLARATION: &str = "method_declaration";

/// Keywords that can precede a parameter's type
const PARAMETER_MODIFIERS: &[&str] = &["this", "params", "ref", "out", "in", "scoped", "readonly"];

pub struct SignatureAnalyzer {
    parser: Parser,
}

impl SignatureAnalyzer {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_c_sharp::LANGUAGE;
        parser
            .set_language(&language.into())
            .map_err(|e| ConvertError::Parser(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Read `path` and analyze its contents.
    pub fn analyze_file(
        &mut self,
        path: &Path,
        handler: &HandlerReference,
    ) -> Result<HandlerSignature> {
        let source = fs::read_to_string(path)
            .map_err(|e| ConvertError::io("Failed to read handler source", path, e))?;
        self.analyze(&source, path, handler)
    }

    /// Find the handler's declaration in `source` and extract its signature.
    ///
    /// `path` is only used for diagnostics.
    pub fn analyze(
        &mut self,
        source: &str,
        path: &Path,
        handler: &HandlerReference,
    ) -> Result<HandlerSignature> {
        let tree = self.parse(source, path)?;
        let name = handler.short_method_name();

        let mut matches = Vec::new();
        collect_methods_named(tree.root_node(), source, name, &mut matches);

        let Some(method) = matches.first().copied() else {
            return Err(ConvertError::HandlerNotFound {
                handler: handler.qualified_name().to_string(),
                path: path.to_path_buf(),
            });
        };

        let signature = extract_signature(method, source);
        if matches.len() > 1 {
            warn!(
                "{} methods named {} in {}; using the declaration on line {}",
                matches.len(),
                name,
                path.display(),
                signature.line
            );
        }
        debug!(
            handler = %handler,
            line = signature.line,
            is_static = signature.is_static,
            "Resolved handler signature"
        );
        Ok(signature)
    }

    fn parse(&mut self, source: &str, path: &Path) -> Result<Tree> {
        let tree = self.parser.parse(source, None).ok_or_else(|| {
            ConvertError::Parser(format!("tree-sitter returned no tree for {}", path.display()))
        })?;
        if tree.root_node().has_error() {
            warn!(
                "{} contains syntax errors; handler lookup may be incomplete",
                path.display()
            );
        }
        Ok(tree)
    }
}

/// Pre-order walk, so matches come out in document order.
fn collect_methods_named<'t>(node: Node<'t>, source: &str, name: &str, out: &mut Vec<Node<'t>>) {
    if node.kind() == METHOD_DECLARATION
        && node
            .child_by_field_name("name")
            .is_some_and(|ident| node_text(ident, source) == name)
    {
        out.push(node);
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_methods_named(child, source, name, out);
    }
}

fn extract_signature(method: Node<'_>, source: &str) -> HandlerSignature {
    let return_type = method
        .child_by_field_name("returns")
        .or_else(|| method.child_by_field_name("type"))
        .map(|node| node_text(node, source).to_string())
        .unwrap_or_default();

    let parameter_types = method
        .child_by_field_name("parameters")
        .map(|list| parameter_types(list, source))
        .unwrap_or_default();

    let mut signature =
        HandlerSignature::new(parameter_types, return_type, is_static(method, source));
    signature.line = method.start_position().row + 1;
    signature
}

fn is_static(method: Node<'_>, source: &str) -> bool {
    let mut cursor = method.walk();
    let found = method
        .children(&mut cursor)
        .filter(|child| child.kind() == "modifier" || child.kind() == "static")
        .any(|child| node_text(child, source) == "static");
    found
}

/// Parameter types in declaration order.
///
/// A `params` array is not wrapped in a `parameter` node; its `type` field sits
/// directly on the list.
fn parameter_types(list: Node<'_>, source: &str) -> Vec<String> {
    let mut types = Vec::new();
    let mut cursor = list.walk();
    if !cursor.goto_first_child() {
        return types;
    }
    loop {
        let child = cursor.node();
        if child.kind() == "parameter" {
            types.push(parameter_type(child, source));
        } else if cursor.field_name() == Some("type") {
            types.push(node_text(child, source).to_string());
        }
        if !cursor.goto_next_sibling() {
            break;
        }
    }
    types
}

fn parameter_type(param: Node<'_>, source: &str) -> String {
    if let Some(ty) = param.child_by_field_name("type") {
        return node_text(ty, source).to_string();
    }

    // Grammar shapes without a `type` field: take everything between the last
    // attribute list and the name, minus leading modifiers.
    let start = attributes_end(param);
    let end = param
        .child_by_field_name("name")
        .map_or(param.end_byte(), |name| name.start_byte());
    let mut text = source.get(start..end).unwrap_or("").trim();
    while let Some(rest) = PARAMETER_MODIFIERS
        .iter()
        .find_map(|keyword| strip_keyword(text, keyword))
    {
        text = rest;
    }
    text.to_string()
}

fn attributes_end(param: Node<'_>) -> usize {
    let mut cursor = param.walk();
    let last_attribute = param
        .children(&mut cursor)
        .filter(|child| child.kind() == "attribute_list")
        .last();
    last_attribute.map_or(param.start_byte(), |attr| attr.end_byte())
}

fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    rest.starts_with(char::is_whitespace).then(|| rest.trim_start())
}

fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or("").trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn analyze(source: &str, handler: &str) -> Result<HandlerSignature> {
        let mut analyzer = SignatureAnalyzer::new().unwrap();
        let handler = HandlerReference::parse(handler).unwrap();
        analyzer.analyze(source, Path::new("Function.cs"), &handler)
    }

    #[test]
    fn test_instance_handler_with_context() {
        let source = indoc! {r#"
            using Amazon.Lambda.Core;

            namespace LambdaToConvert
            {
                public class Function
                {
                    public string MySampleLambdaHandler(string input, ILambdaContext context)
                    {
                        return input.ToUpper();
                    }
                }
            }
        "#};
        let signature = analyze(source, "LambdaToConvert.Function.MySampleLambdaHandler").unwrap();
        assert_eq!(signature.parameter_types, vec!["string", "ILambdaContext"]);
        assert_eq!(signature.return_type, "string");
        assert!(!signature.is_static);
        assert!(!signature.is_void_return);
        assert_eq!(signature.line, 7);
    }

    #[test]
    fn test_static_void_handler() {
        let source = indoc! {r#"
            namespace Ns;

            public static class Handlers
            {
                public static void Handle(Evt e) { }
            }
        "#};
        let signature = analyze(source, "Ns.Handlers.Handle").unwrap();
        assert!(signature.is_static);
        assert!(signature.is_void_return);
        assert_eq!(signature.parameter_types, vec!["Evt"]);
    }

    #[test]
    fn test_generic_types_keep_their_text() {
        let source = indoc! {r#"
            public class Function
            {
                public async Task<APIGatewayProxyResponse> Handle(Dictionary<string, int> counts, ILambdaContext ctx)
                {
                    return null;
                }
            }
        "#};
        let signature = analyze(source, "Function.Handle").unwrap();
        assert_eq!(signature.return_type, "Task<APIGatewayProxyResponse>");
        assert_eq!(
            signature.parameter_types,
            vec!["Dictionary<string, int>", "ILambdaContext"]
        );
        assert!(!signature.is_static);
    }

    #[test]
    fn test_parameter_attributes_and_modifiers_are_not_part_of_the_type() {
        let source = indoc! {r#"
            public class Function
            {
                public static string Handle([FromBody] Order order, ref int count) => "";
            }
        "#};
        let signature = analyze(source, "Function.Handle").unwrap();
        assert_eq!(signature.parameter_types, vec!["Order", "int"]);
    }

    #[test]
    fn test_params_array_is_kept_in_order() {
        let source = indoc! {r#"
            public class Function
            {
                public void Handle(Evt e, params string[] rest) { }
            }
        "#};
        let signature = analyze(source, "Function.Handle").unwrap();
        assert_eq!(signature.parameter_types, vec!["Evt", "string[]"]);
        assert_eq!(signature.arity(), 2);
    }

    #[test]
    fn test_grammar_loads() {
        assert!(SignatureAnalyzer::new().is_ok());
    }

    #[test]
    fn test_first_declaration_wins() {
        let source = indoc! {r#"
            public class First
            {
                public static void Handle(string a) { }
            }

            public class Second
            {
                public int Handle(int a, int b) { return a; }
            }
        "#};
        let signature = analyze(source, "Second.Handle").unwrap();
        assert_eq!(signature.parameter_types, vec!["string"]);
        assert!(signature.is_static);
        assert_eq!(signature.line, 3);
    }

    #[test]
    fn test_matches_method_not_property_or_field() {
        let source = indoc! {r#"
            public class Function
            {
                public string Handle { get; set; }
                public Task Handle2(Evt e) => Task.CompletedTask;
            }
        "#};
        let err = analyze(source, "Function.Handle").unwrap_err();
        assert!(matches!(err, ConvertError::HandlerNotFound { .. }));
    }

    #[test]
    fn test_missing_handler_names_reference_and_path() {
        let err = analyze("public class Function { }", "Ns.Function.Missing").unwrap_err();
        match err {
            ConvertError::HandlerNotFound { handler, path } => {
                assert_eq!(handler, "Ns.Function.Missing");
                assert_eq!(path, Path::new("Function.cs"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_analyze_file_reports_missing_file() {
        let mut analyzer = SignatureAnalyzer::new().unwrap();
        let handler = HandlerReference::parse("Ns.Function.Handle").unwrap();
        let err = analyzer
            .analyze_file(Path::new("/definitely/not/here/Function.cs"), &handler)
            .unwrap_err();
        assert!(matches!(err, ConvertError::Io { .. }));
    }
}
