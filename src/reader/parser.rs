use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{cut, eof, opt, recognize, verify},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{pair, preceded},
    IResult, Parser,
};

use crate::reader::ReadError;

/// Deepest list nesting a line may have. Parsing, reading, evaluating and dropping
/// all recurse once per level, so this also bounds their stack use.
pub const MAX_PARSE_DEPTH: usize = 64;

/// Words the grammar accepts as symbols, besides the single operator characters.
pub const SYMBOL_NAMES: [&str; 5] = ["list", "first", "rest", "eval", "conj"];

pub const ROOT_TAG: &str = ">";
pub const NUMBER_TAG: &str = "expr|number|regex";
pub const SYMBOL_TAG: &str = "expr|symbol|string";
pub const SEXPR_TAG: &str = "expr|sexpr|>";
pub const QEXPR_TAG: &str = "expr|qexpr|>";
pub const CHAR_TAG: &str = "char";
pub const REGEX_TAG: &str = "regex";

/// One node of the generic syntax tree.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct AstNode {
    pub tag: String,
    pub contents: String,
    pub children: Vec<AstNode>,
}

impl AstNode {
    pub fn leaf(tag: &str, contents: impl Into<String>) -> AstNode {
        AstNode {
            tag: tag.into(),
            contents: contents.into(),
            children: Vec::new(),
        }
    }

    pub fn branch(tag: &str, children: Vec<AstNode>) -> AstNode {
        AstNode {
            tag: tag.into(),
            contents: String::new(),
            children,
        }
    }
}

/// Builds the tree for a whole input line:
///
/// ```text
/// root   : /^/ expr* /$/
/// expr   : number | symbol | sexpr | qexpr
/// number : /-?[0-9]+/
/// symbol : '+' | '-' | '*' | '/' | '%' | "list" | "first" | "rest" | "eval" | "conj"
/// sexpr  : '(' expr* ')'
/// qexpr  : '{' expr* '}'
/// ```
pub fn parse(src: &str) -> Result<AstNode, ReadError> { parse_root(src).map(|(_, root)| root).map_err(|err| read_error(src, err)) }

fn parse_root(input: &str) -> IResult<&str, AstNode> {
    let (input, exprs) = many0(preceded(multispace0, |i| parse_expr(i, 0))).parse(input)?;
    let (input, _) = multispace0.parse(input)?;
    let (input, _) = eof.parse(input)?;

    let mut children = Vec::with_capacity(exprs.len() + 2);
    children.push(AstNode::leaf(REGEX_TAG, ""));
    children.extend(exprs);
    children.push(AstNode::leaf(REGEX_TAG, ""));
    Ok((input, AstNode::branch(ROOT_TAG, children)))
}

fn parse_expr(input: &str, depth: usize) -> IResult<&str, AstNode> {
    if depth > MAX_PARSE_DEPTH {
        return Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)));
    }
    alt((
        parse_number,
        parse_symbol,
        |i| parse_list(i, depth, '(', ')', SEXPR_TAG),
        |i| parse_list(i, depth, '{', '}', QEXPR_TAG),
    ))
    .parse(input)
}

/// `-5` is a number, `- 5` is a negation.
fn parse_number(input: &str) -> IResult<&str, AstNode> {
    recognize(pair(opt(char('-')), digit1))
        .map(|text: &str| AstNode::leaf(NUMBER_TAG, text))
        .parse(input)
}

fn parse_symbol(input: &str) -> IResult<&str, AstNode> {
    let operator = recognize(one_of("+-*/%"));
    let word = verify(take_while1(|c: char| c.is_ascii_alphanumeric()), |word: &str| SYMBOL_NAMES.contains(&word));
    alt((operator, word)).map(|text: &str| AstNode::leaf(SYMBOL_TAG, text)).parse(input)
}

fn parse_list<'a>(input: &'a str, depth: usize, open: char, close: char, tag: &str) -> IResult<&'a str, AstNode> {
    let (input, _) = char(open).parse(input)?;
    let (input, cells) = many0(preceded(multispace0, |i| parse_expr(i, depth + 1))).parse(input)?;
    let (input, _) = multispace0.parse(input)?;
    // past the opening delimiter there is nothing to backtrack to
    let (input, _) = cut(char(close)).parse(input)?;

    let mut children = Vec::with_capacity(cells.len() + 2);
    children.push(AstNode::leaf(CHAR_TAG, open.to_string()));
    children.extend(cells);
    children.push(AstNode::leaf(CHAR_TAG, close.to_string()));
    Ok((input, AstNode::branch(tag, children)))
}

fn read_error(src: &str, err: nom::Err<Error<&str>>) -> ReadError {
    let rest = match &err {
        nom::Err::Error(e) | nom::Err::Failure(e) => e.input,
        nom::Err::Incomplete(_) => "",
    };
    let message = match (&err, rest.chars().next()) {
        (nom::Err::Failure(e), _) if e.code == ErrorKind::TooLarge => {
            format!("Expression too deeply nested (max depth: {})", MAX_PARSE_DEPTH)
        }
        (_, None) => "Unexpected end of input".to_string(),
        (_, Some(c)) if c.is_ascii_alphabetic() => {
            let word = rest.split(|c: char| !c.is_ascii_alphanumeric()).next().unwrap_or_default();
            format!("Unknown symbol `{}`", word)
        }
        (_, Some(c)) => format!("Unexpected `{}`", c),
    };
    ReadError {
        message,
        offset: src.len() - rest.len(),
    }
}

#[cfg(test)]
mod test_parser {
    use super::*;

    fn leaves(src: &str) -> Vec<(&'static str, String)> {
        let root = parse(src).unwrap();
        let tags = [NUMBER_TAG, SYMBOL_TAG];
        root.children
            .into_iter()
            .filter_map(|n| tags.iter().find(|&&t| t == n.tag).map(|&t| (t, n.contents)))
            .collect()
    }

    fn nested(depth: usize) -> String { format!("{}1{}", "(".repeat(depth), ")".repeat(depth)) }

    #[test]
    fn test_root_shape() {
        let root = parse("+ 1 2").unwrap();
        assert_eq!(root.tag, ROOT_TAG);
        let tags: Vec<&str> = root.children.iter().map(|n| n.tag.as_str()).collect();
        assert_eq!(tags, vec![REGEX_TAG, SYMBOL_TAG, NUMBER_TAG, NUMBER_TAG, REGEX_TAG]);
        assert_eq!(root.children[2].contents, "1");
    }

    #[test]
    fn test_nested_lists_keep_delimiters() {
        let root = parse("(eval {+ 1})").unwrap();
        let sexpr = &root.children[1];
        assert_eq!(sexpr.tag, SEXPR_TAG);
        assert_eq!(sexpr.children.first().unwrap(), &AstNode::leaf(CHAR_TAG, "("));
        assert_eq!(sexpr.children.last().unwrap(), &AstNode::leaf(CHAR_TAG, ")"));

        let qexpr = &sexpr.children[2];
        assert_eq!(qexpr.tag, QEXPR_TAG);
        assert_eq!(qexpr.children.len(), 4);
        assert_eq!(qexpr.children[1], AstNode::leaf(SYMBOL_TAG, "+"));
    }

    #[test]
    fn test_whitespace_is_optional_between_lists() {
        let root = parse("  conj{1}{2}\t").unwrap();
        assert_eq!(root.children.len(), 5);
    }

    #[test]
    fn test_negative_number_vs_minus() {
        assert_eq!(leaves("-5"), vec![(NUMBER_TAG, "-5".to_string())]);
        assert_eq!(leaves("- 5"), vec![(SYMBOL_TAG, "-".to_string()), (NUMBER_TAG, "5".to_string())]);
        // a sign glued to digits always belongs to the number, so this is two numbers
        assert_eq!(leaves("1-2"), vec![(NUMBER_TAG, "1".to_string()), (NUMBER_TAG, "-2".to_string())]);
    }

    #[test]
    fn test_builtin_names() {
        for name in SYMBOL_NAMES {
            assert_eq!(leaves(name), vec![(SYMBOL_TAG, name.to_string())]);
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse("").unwrap().children.len(), 2);
        assert_eq!(parse(" \t ").unwrap().children.len(), 2);
    }

    #[test]
    fn test_unknown_word() {
        let err = parse("+ 1 head").unwrap_err();
        assert_eq!(err, ReadError { message: "Unknown symbol `head`".into(), offset: 4 });
        assert_eq!(parse("(list lists)").unwrap_err().message, "Unknown symbol `lists`");
    }

    #[test]
    fn test_unexpected_character() {
        let err = parse("(+ 1 #t)").unwrap_err();
        assert_eq!(err, ReadError { message: "Unexpected `#`".into(), offset: 5 });
    }

    #[test]
    fn test_unclosed() {
        let err = parse("+ 1 (* 2 3").unwrap_err();
        assert_eq!(err, ReadError { message: "Unexpected end of input".into(), offset: 10 });
    }

    #[test]
    fn test_mismatched_close() {
        let err = parse("(1 2}").unwrap_err();
        assert_eq!(err, ReadError { message: "Unexpected `}`".into(), offset: 4 });
    }

    #[test]
    fn test_stray_close() {
        assert_eq!(parse("1 )").unwrap_err(), ReadError { message: "Unexpected `)`".into(), offset: 2 });
    }

    #[test]
    fn test_depth_limit() {
        assert!(parse(&nested(MAX_PARSE_DEPTH)).is_ok());

        let err = parse(&nested(MAX_PARSE_DEPTH + 1)).unwrap_err();
        assert_eq!(err.message, format!("Expression too deeply nested (max depth: {})", MAX_PARSE_DEPTH));
        assert_eq!(err.offset, MAX_PARSE_DEPTH + 1);

        let err = parse(&format!("+ 1 {}", "{".repeat(100_000))).unwrap_err();
        assert!(err.message.starts_with("Expression too deeply nested"));
    }
}
