//! Namespace blocks
//!
//! A source file is a sequence of `namespace Name { ... }` blocks. Declarations
//! inside a block are tried against every registered kind grammar in order.
use crate::ast::{merge_namespaces, Namespace, Type};
use crate::input::Input;
use crate::lexical::{keyword, namespace_name, spaces, spaces1};
use crate::parser::*;

/// `namespace Name {`
fn header<'a>() -> impl Parser<'a, String> {
    spaces()
        .then(keyword("namespace"))
        .then(spaces1())
        .then(namespace_name())
        .skip(spaces())
        .skip(char('{'))
}

/// `namespace Name { decl* }`
pub fn namespace<'a>(parsers: Vec<BoxedParser<'a, Type>>) -> impl Parser<'a, Namespace> {
    let header = header();
    let body = many(choice(parsers));
    let close = spaces().then(char('}'));
    move |input: Input<'a>| {
        let (name, rest) = header.parse(input)?;
        let (types, rest) = body.parse(rest)?;
        let (_, rest) = close.parse(rest)?;

        let mut namespace = Namespace::new(name);
        for ty in types {
            namespace.add_type(ty);
        }
        Some((namespace, rest))
    }
}

/// Zero or more namespace blocks covering the whole input. Reopened
/// namespaces are merged into their first occurrence.
pub fn multiple_namespaces<'a>(parsers: Vec<BoxedParser<'a, Type>>) -> impl Parser<'a, Vec<Namespace>> {
    let blocks = many(namespace(parsers)).skip(spaces()).skip(eof());
    map(blocks, |namespaces: Vec<Namespace>| merge_namespaces(namespaces))
}

/// Where [`multiple_namespaces`] gets stuck on `input`: the first declaration
/// no grammar accepts, or the start of the first malformed block.
pub fn failure_point<'a>(parsers: Vec<BoxedParser<'a, Type>>, input: Input<'a>) -> Input<'a> {
    let declaration = choice(parsers);
    let mut rest = input;
    loop {
        let (_, at) = spaces().parse(rest).unwrap_or(((), rest));
        let (_, body) = match header().parse(at) {
            Some(found) => found,
            None => return at,
        };
        let (_, after) = many(|i: Input<'a>| declaration.parse(i)).parse(body).unwrap_or((Vec::new(), body));
        match spaces().then(char('}')).parse(after) {
            Some((_, next)) => rest = next,
            None => return spaces().parse(after).map_or(after, |(_, at)| at),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::{self, Argument, Named};
    use crate::config::KindRegistry;

    fn parsed(src: &str) -> Option<Vec<Namespace>> {
        let registry = KindRegistry::default();
        run(&multiple_namespaces(registry.parsers()), src).map(|(namespaces, _)| namespaces)
    }

    #[test]
    fn parses_enum_and_data() {
        let src = "namespace Foo {\n    enum Color = Red | Green | Blue;\n    data Human = { string $name, ?int $age };\n}\n";
        let namespaces = parsed(src).unwrap();
        assert_eq!(namespaces.len(), 1);
        assert_eq!(namespaces[0].name, "Foo");
        assert_eq!(
            namespaces[0].types,
            vec![
                Type::Enum(ast::Enum {
                    classname: "Color".to_string(),
                    markers: vec![],
                    variants: vec!["Red".to_string(), "Green".to_string(), "Blue".to_string()],
                    derivings: vec![],
                }),
                Type::Data(ast::Data {
                    classname: "Human".to_string(),
                    markers: vec![],
                    arguments: vec![
                        Argument::new("name").typed("string"),
                        Argument::new("age").typed("int").nullable(),
                    ],
                    derivings: vec![],
                }),
            ]
        );
    }

    #[test]
    fn two_enums_keep_declaration_order() {
        let src = "namespace Foo {\n    enum Color = Red | Green | Blue;\n    enum Human = Man | Woman;\n}";
        let namespaces = parsed(src).unwrap();
        assert_eq!(namespaces.len(), 1);
        assert_eq!(namespaces[0].name, "Foo");
        assert!(namespaces[0].imports.is_empty());

        let variants: Vec<(&str, usize)> = namespaces[0]
            .types
            .iter()
            .map(|ty| match ty {
                Type::Enum(e) => (e.classname.as_str(), e.variants.len()),
                other => panic!("expected enum, got {:?}", other),
            })
            .collect();
        assert_eq!(variants, vec![("Color", 3), ("Human", 2)]);
    }

    #[test]
    fn qualified_namespace_names_are_kept_as_written() {
        let namespaces = parsed("namespace Foo\\Bar { int Age; }").unwrap();
        assert_eq!(namespaces[0].name, "Foo\\Bar");
        let namespaces = parsed("namespace Foo.Bar { int Age; }").unwrap();
        assert_eq!(namespaces[0].name, "Foo.Bar");
    }

    #[test]
    fn empty_input_has_no_namespaces() {
        assert_eq!(parsed(""), Some(vec![]));
        assert_eq!(parsed("  // nothing here\n"), Some(vec![]));
        assert_eq!(parsed("namespace Foo {}"), Some(vec![Namespace::new("Foo")]));
    }

    #[test]
    fn anonymous_namespace_fails() {
        assert_eq!(parsed("namespace { }"), None);
        assert_eq!(parsed("namespace {\n    int Age;\n}"), None);
    }

    #[test]
    fn unknown_declaration_fails() {
        assert_eq!(parsed("namespace Foo { record Age; }"), None);
        assert_eq!(parsed("namespace Foo { int Age; "), None);
    }

    #[test]
    fn reopened_namespaces_merge() {
        let src = "namespace Foo { int Age; }\nnamespace Bar { bool Flag; }\nnamespace Foo { guid Id; }";
        let namespaces = parsed(src).unwrap();
        let names: Vec<&str> = namespaces.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Foo", "Bar"]);
        assert_eq!(
            namespaces[0].types,
            vec![
                Type::Int(Named::new("Age", vec![])),
                Type::Guid(Named::new("Id", vec![]))
            ]
        );
        assert_eq!(namespaces[0].imports.len(), 4);
    }

    #[test]
    fn failure_point_is_the_rejected_declaration() {
        let src = "namespace Foo {\n    int Age;\n    record Person;\n}";
        let at = failure_point(KindRegistry::default().parsers(), Input::new(src));
        assert_eq!(at.line_col(), (3, 5));
        assert_eq!(at.remaining(), "record Person;\n}");

        let at = failure_point(KindRegistry::default().parsers(), Input::new("namespace Foo {}\nnamespace {}"));
        assert_eq!(at.line_col(), (2, 1));
    }

    #[test]
    fn mixed_kinds_in_one_block() {
        let namespaces = parsed("namespace Foo { string Name; marker Named; }").unwrap();
        let kinds: Vec<_> = namespaces[0].types.iter().map(Type::kind).collect();
        assert_eq!(kinds, vec![crate::ast::Kind::String, crate::ast::Kind::Marker]);
    }
}
