//! FPP lexical primitives built on the combinator core
use crate::input::Input;
use crate::parser::*;

pub fn letter<'a>() -> impl Parser<'a, char> { satisfy(|c| c.is_ascii_alphabetic()) }

pub fn digit<'a>() -> impl Parser<'a, char> { satisfy(|c| c.is_ascii_digit()) }

pub fn alphanum<'a>() -> impl Parser<'a, char> { satisfy(|c| c.is_ascii_alphanumeric()) }

fn ident_start<'a>() -> impl Parser<'a, char> { letter().or(char('_')) }

fn ident_char<'a>() -> impl Parser<'a, char> { alphanum().or(char('_')) }

fn line_comment<'a>() -> impl Parser<'a, &'a str> { recognize(string("//").then(many(satisfy(|c| c != '\n')))) }

fn blank<'a>() -> impl Parser<'a, ()> {
    let ws = map(satisfy(char::is_whitespace), |_| ());
    ws.or(map(line_comment(), |_| ()))
}

/// Zero or more whitespace chars or `//` comments. Never fails.
pub fn spaces<'a>() -> impl Parser<'a, ()> { map(many(blank()), |_| ()) }

/// One or more whitespace chars or `//` comments.
pub fn spaces1<'a>() -> impl Parser<'a, ()> { map(many1(blank()), |_| ()) }

/// Parses `[A-Za-z_][A-Za-z0-9_]*`
pub fn identifier<'a>() -> impl Parser<'a, String> {
    map(recognize(ident_start().then(many(ident_char()))), str::to_string)
}

/// Identifier, optionally qualified with `\` separated segments.
pub fn type_name<'a>() -> impl Parser<'a, String> {
    map(
        recognize(sep_by1(identifier(), char('\\'))),
        str::to_string,
    )
}

/// Namespace name, with `\` or `.` as the separator. Never empty.
pub fn namespace_name<'a>() -> impl Parser<'a, String> {
    map(
        recognize(sep_by1(identifier(), char('\\').or(char('.')))),
        str::to_string,
    )
}

/// `=` with optional surrounding whitespace
pub fn assignment<'a>() -> impl Parser<'a, char> { surrounded(spaces(), char('='), spaces()) }

/// Matches `word` only when it is not the prefix of a longer identifier.
pub fn keyword<'a>(word: &'static str) -> impl Parser<'a, &'a str> {
    move |input: Input<'a>| {
        let (matched, rest) = string(word).parse(input)?;
        match rest.peek() {
            Some(c) if c.is_ascii_alphanumeric() || c == '_' => None,
            _ => Some((matched, rest)),
        }
    }
}

/// Comma separated identifiers between `open` and `close`. Duplicates fail.
fn name_list<'a>(open: char, close: char) -> impl Parser<'a, Vec<String>> {
    let item = surrounded(spaces(), type_name(), spaces());
    let list = surrounded(char(open), sep_by1(item, char(',')), char(close));
    move |input: Input<'a>| {
        let (names, rest) = list.parse(input)?;
        let mut seen = std::collections::HashSet::new();
        if names.iter().all(|n| seen.insert(n.as_str())) {
            Some((names, rest))
        } else {
            None
        }
    }
}

/// Marker list attached to a declaration, `(A, B)` or `[A, B]`.
pub fn markers<'a>() -> impl Parser<'a, Vec<String>> { name_list('(', ')').or(name_list('[', ']')) }

/// `deriving (A, B)`, yielding the raw tags
pub fn deriving_clause<'a>() -> impl Parser<'a, Vec<String>> {
    keyword("deriving").then(spaces()).then(name_list('(', ')'))
}

/// Literal accepted as an argument default value.
pub fn literal<'a>() -> impl Parser<'a, String> {
    let number = recognize(
        optional(char('-'))
            .then(many1(digit()))
            .then(optional(char('.').then(many1(digit())))),
    );
    let quoted = recognize(surrounded_with(char('\''), many(satisfy(|c| c != '\''))));
    let word = keyword("null").or(keyword("true")).or(keyword("false"));
    map(number.or(quoted).or(word).or(string("[]")), str::to_string)
}
