//! Parser combinator core
//!
//! A parser turns an [`Input`] into `Some((value, rest))` or `None`. The grammar
//! is deterministic, so only the first success of an alternative is kept and
//! failure simply propagates as `None` through every combinator.
use crate::input::Input;

pub type ParseResult<'a, T> = Option<(T, Input<'a>)>;

pub trait Parser<'a, T> {
    fn parse(&self, input: Input<'a>) -> ParseResult<'a, T>;
}

// Closures and plain fns are parsers.
impl<'a, T, F> Parser<'a, T> for F
where
    F: Fn(Input<'a>) -> ParseResult<'a, T>,
{
    fn parse(&self, input: Input<'a>) -> ParseResult<'a, T> { self(input) }
}

pub type BoxedParser<'a, T> = Box<dyn Parser<'a, T> + 'a>;

impl<'a, T> Parser<'a, T> for Box<dyn Parser<'a, T> + 'a> {
    fn parse(&self, input: Input<'a>) -> ParseResult<'a, T> { (**self).parse(input) }
}

/// Runs `parser` from the start of `src`.
pub fn run<'a, T, P: Parser<'a, T>>(parser: &P, src: &'a str) -> ParseResult<'a, T> { parser.parse(Input::new(src)) }

/// Consumes exactly one char.
pub fn item<'a>() -> impl Parser<'a, char> { |input: Input<'a>| input.next() }

pub fn satisfy<'a, F>(pred: F) -> impl Parser<'a, char>
where
    F: Fn(char) -> bool,
{
    move |input: Input<'a>| input.next().filter(|(c, _)| pred(*c))
}

pub fn char<'a>(expected: char) -> impl Parser<'a, char> { satisfy(move |c| c == expected) }

/// Matches `expected` literally, yielding the matched slice.
pub fn string<'a, S: AsRef<str>>(expected: S) -> impl Parser<'a, &'a str> {
    move |input: Input<'a>| {
        let expected = expected.as_ref();
        if input.remaining().starts_with(expected) {
            let rest = input.advance(expected.len());
            Some((input.slice_to(&rest), rest))
        } else {
            None
        }
    }
}

/// Succeeds without consuming anything.
pub fn result<'a, T: Clone>(value: T) -> impl Parser<'a, T> { move |input: Input<'a>| Some((value.clone(), input)) }

/// Monadic sequencing: the value of `parser` picks the parser that runs next.
pub fn bind<'a, A, B, P, Q, F>(parser: P, f: F) -> impl Parser<'a, B>
where
    P: Parser<'a, A>,
    Q: Parser<'a, B>,
    F: Fn(A) -> Q,
{
    move |input: Input<'a>| {
        let (value, rest) = parser.parse(input)?;
        f(value).parse(rest)
    }
}

pub fn map<'a, A, B, P, F>(parser: P, f: F) -> impl Parser<'a, B>
where
    P: Parser<'a, A>,
    F: Fn(A) -> B,
{
    move |input: Input<'a>| parser.parse(input).map(|(value, rest)| (f(value), rest))
}

/// Runs both, keeps the right value.
pub fn then<'a, A, B, P, Q>(first: P, second: Q) -> impl Parser<'a, B>
where
    P: Parser<'a, A>,
    Q: Parser<'a, B>,
{
    move |input: Input<'a>| {
        let (_, rest) = first.parse(input)?;
        second.parse(rest)
    }
}

/// Runs both, keeps the left value.
pub fn skip<'a, A, B, P, Q>(first: P, second: Q) -> impl Parser<'a, A>
where
    P: Parser<'a, A>,
    Q: Parser<'a, B>,
{
    move |input: Input<'a>| {
        let (value, rest) = first.parse(input)?;
        let (_, rest) = second.parse(rest)?;
        Some((value, rest))
    }
}

/// Runs `parser` and replaces its value.
pub fn value<'a, A, T, P>(parser: P, v: T) -> impl Parser<'a, T>
where
    P: Parser<'a, A>,
    T: Clone,
{
    move |input: Input<'a>| parser.parse(input).map(|(_, rest)| (v.clone(), rest))
}

/// Succeeds only at the end of input.
pub fn eof<'a>() -> impl Parser<'a, ()> {
    |input: Input<'a>| if input.is_empty() { Some(((), input)) } else { None }
}

/// Ordered choice: `right` is only tried when `left` fails.
pub fn plus<'a, T, P, Q>(left: P, right: Q) -> impl Parser<'a, T>
where
    P: Parser<'a, T>,
    Q: Parser<'a, T>,
{
    move |input: Input<'a>| left.parse(input).or_else(|| right.parse(input))
}

/// Ordered choice over a dynamic list of parsers.
pub fn choice<'a, T>(parsers: Vec<BoxedParser<'a, T>>) -> impl Parser<'a, T> {
    move |input: Input<'a>| parsers.iter().find_map(|p| p.parse(input))
}

pub fn optional<'a, T, P: Parser<'a, T>>(parser: P) -> impl Parser<'a, Option<T>> {
    move |input: Input<'a>| match parser.parse(input) {
        Some((value, rest)) => Some((Some(value), rest)),
        None => Some((None, input)),
    }
}

fn repeat<'a, T, P: Parser<'a, T>>(parser: &P, mut input: Input<'a>, out: &mut Vec<T>) -> Input<'a> {
    while let Some((value, rest)) = parser.parse(input) {
        // a success that consumed nothing would repeat forever
        if rest.offset() == input.offset() {
            break;
        }
        out.push(value);
        input = rest;
    }
    input
}

/// Zero or more, greedy. Never fails.
pub fn many<'a, T, P: Parser<'a, T>>(parser: P) -> impl Parser<'a, Vec<T>> {
    move |input: Input<'a>| {
        let mut out = Vec::new();
        let rest = repeat(&parser, input, &mut out);
        Some((out, rest))
    }
}

pub fn many1<'a, T, P: Parser<'a, T>>(parser: P) -> impl Parser<'a, Vec<T>> {
    move |input: Input<'a>| {
        let (first, rest) = parser.parse(input)?;
        let mut out = vec![first];
        let rest = repeat(&parser, rest, &mut out);
        Some((out, rest))
    }
}

/// One or more `parser` separated by `sep`.
pub fn sep_by1<'a, T, S, P, Q>(parser: P, sep: Q) -> impl Parser<'a, Vec<T>>
where
    P: Parser<'a, T>,
    Q: Parser<'a, S>,
{
    move |input: Input<'a>| {
        let (first, mut rest) = parser.parse(input)?;
        let mut out = vec![first];
        while let Some((value, after)) = sep.parse(rest).and_then(|(_, r)| parser.parse(r)) {
            if after.offset() == rest.offset() {
                break;
            }
            out.push(value);
            rest = after;
        }
        Some((out, rest))
    }
}

/// `open inner close`, keeping only the inner value.
pub fn surrounded<'a, A, T, B, O, P, C>(open: O, inner: P, close: C) -> impl Parser<'a, T>
where
    O: Parser<'a, A>,
    P: Parser<'a, T>,
    C: Parser<'a, B>,
{
    move |input: Input<'a>| {
        let (_, rest) = open.parse(input)?;
        let (value, rest) = inner.parse(rest)?;
        let (_, rest) = close.parse(rest)?;
        Some((value, rest))
    }
}

/// Like [`surrounded`] with the same delimiter on both sides, e.g. quotes.
pub fn surrounded_with<'a, D, T, Q, P>(delimiter: Q, inner: P) -> impl Parser<'a, T>
where
    Q: Parser<'a, D>,
    P: Parser<'a, T>,
{
    move |input: Input<'a>| {
        let (_, rest) = delimiter.parse(input)?;
        let (value, rest) = inner.parse(rest)?;
        let (_, rest) = delimiter.parse(rest)?;
        Some((value, rest))
    }
}

/// Yields the source text consumed by `parser`.
pub fn recognize<'a, T, P: Parser<'a, T>>(parser: P) -> impl Parser<'a, &'a str> {
    move |input: Input<'a>| {
        let (_, rest) = parser.parse(input)?;
        Some((input.slice_to(&rest), rest))
    }
}

/// Method-call sugar over the free combinators.
pub trait ParserExt<'a, T>: Parser<'a, T> + Sized {
    fn map<U, F: Fn(T) -> U>(self, f: F) -> impl Parser<'a, U> { map(self, f) }

    fn bind<U, Q: Parser<'a, U>, F: Fn(T) -> Q>(self, f: F) -> impl Parser<'a, U> { bind(self, f) }

    fn or<Q: Parser<'a, T>>(self, other: Q) -> impl Parser<'a, T> { plus(self, other) }

    fn then<U, Q: Parser<'a, U>>(self, next: Q) -> impl Parser<'a, U> { then(self, next) }

    fn skip<U, Q: Parser<'a, U>>(self, next: Q) -> impl Parser<'a, T> { skip(self, next) }

    fn boxed(self) -> BoxedParser<'a, T>
    where
        Self: 'a,
    {
        Box::new(self)
    }
}

impl<'a, T, P: Parser<'a, T>> ParserExt<'a, T> for P {}
