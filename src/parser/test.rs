use super::{
    parse, parse_statement, tokenize, Expression, LexError, Locatable, Location, Name, Operator,
    ParseError, Span, Statement, TokenType as TT, Tokenizer, TokenizerState,
};
use crate::interpreter::Value;

fn parse_string(input: &str) -> Result<Statement, String> {
    let tokens = tokenize(input).map_err(|e| e.to_string())?;
    parse(&tokens).map_err(|e| e.to_string())
}

fn parse_tree_matches(input: &str, tree_repr: &str) {
    let result = parse_string(input);
    match result {
        Ok(ref tree) => {
            let result_repr = format!("{tree:?}");
            assert!(
                result_repr.contains(tree_repr),
                "\nFailed to parse \"{}\":\nexpected \"{}\" somewhere in \"{}\"\n",
                input,
                tree_repr,
                result_repr
            )
        }
        Err(e) => panic!("\nFailed to parse \"{}\": {}\n", input, e),
    }
}

fn parse_error(input: &str) -> ParseError {
    let tokens = tokenize(input).expect("input should tokenize");
    match parse(&tokens) {
        Ok(tree) => panic!("\"{input}\" parsed unexpectedly to {tree:?}"),
        Err(e) => e,
    }
}

fn token_types(input: &str) -> Vec<TT> {
    tokenize(input)
        .expect("input should tokenize")
        .iter()
        .map(|t| t.typ())
        .collect()
}

fn literal(value: Value) -> Expression {
    Expression::Literal(value, Span::default())
}

#[test]
fn test_tokenize_assignment() {
    assert_eq!(token_types("x = 5"), vec![TT::NAME, TT::EQUAL, TT::INTEGER]);
    assert_eq!(
        token_types("total=(a+b)*c/d-e"),
        vec![
            TT::NAME,
            TT::EQUAL,
            TT::LPAR,
            TT::NAME,
            TT::PLUS,
            TT::NAME,
            TT::RPAR,
            TT::STAR,
            TT::NAME,
            TT::SLASH,
            TT::NAME,
            TT::MINUS,
            TT::NAME
        ]
    );
}

#[test]
fn test_tokenize_literals() {
    let tokens = tokenize("42 2.5 \"hello world\" true false").unwrap();
    let values: Vec<_> = tokens.iter().map(|t| t.value().cloned()).collect();
    assert_eq!(
        values,
        vec![
            Some(Value::Integer(42)),
            Some(Value::Float(2.5)),
            Some(Value::String("hello world".to_string())),
            Some(Value::Boolean(true)),
            Some(Value::Boolean(false)),
        ]
    );
    assert_eq!(tokens[2].lexeme(), "\"hello world\"");
    assert_eq!(tokens[2].typ(), TT::STRING);
}

#[test]
fn test_tokenize_names() {
    assert_eq!(token_types("truthy _tmp1 false_"), vec![TT::NAME, TT::NAME, TT::NAME]);
    assert_eq!(token_types("true"), vec![TT::BOOLEAN]);
    let tokens = tokenize("_tmp1").unwrap();
    assert_eq!(tokens[0].lexeme(), "_tmp1");
    assert_eq!(tokens[0].value(), None);
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        token_types("[ ] { } : ,"),
        vec![TT::LSQB, TT::RSQB, TT::LBRACE, TT::RBRACE, TT::COLON, TT::COMMA]
    );
    assert_eq!(token_types("a/b"), vec![TT::NAME, TT::SLASH, TT::NAME]);
}

#[test]
fn test_tokenize_comments() {
    assert!(tokenize("// comment").unwrap().is_empty());
    assert!(tokenize("/* a\n b\n c */").unwrap().is_empty());
    assert!(tokenize("/* one */ /* two */").unwrap().is_empty());
    assert_eq!(token_types("1 // two"), vec![TT::INTEGER]);
    assert_eq!(token_types("1 /* x */ + 2"), vec![TT::INTEGER, TT::PLUS, TT::INTEGER]);
    assert_eq!(token_types("/* /* */ 1"), vec![TT::INTEGER]);
    assert_eq!(token_types("x /* spans\nlines */ + y"), vec![TT::NAME, TT::PLUS, TT::NAME]);
}

#[test]
fn test_token_spans() {
    let tokens = tokenize("x = 10").unwrap();
    assert_eq!(tokens[2].span(), Span::new(1, 5, 1, 7));
    let tokens = tokenize("/* c */\n  y").unwrap();
    assert_eq!(tokens[0].span().start, Location { line: 2, column: 3 });
}

#[test]
fn test_token_equality_ignores_position() {
    assert_eq!(tokenize("1").unwrap(), tokenize("   1").unwrap());
    assert_ne!(tokenize("1").unwrap(), tokenize("2").unwrap());
}

#[test]
fn test_lex_errors() {
    assert_eq!(
        tokenize("\"abc"),
        Err(LexError::UnterminatedString(Location { line: 1, column: 1 }))
    );
    assert_eq!(
        tokenize("x = \"a\nb\""),
        Err(LexError::UnterminatedString(Location { line: 1, column: 5 }))
    );
    assert_eq!(
        tokenize("1 /* open"),
        Err(LexError::UnterminatedComment(Location { line: 1, column: 3 }))
    );
    assert_eq!(
        tokenize("x = 1 $"),
        Err(LexError::InvalidCharacter('$', Location { line: 1, column: 7 }))
    );
    assert_eq!(
        tokenize("1.2.3"),
        Err(LexError::InvalidCharacter('.', Location { line: 1, column: 4 }))
    );
    assert!(matches!(
        tokenize("99999999999999999999"),
        Err(LexError::IntegerOverflow(ref digits, _)) if digits == "99999999999999999999"
    ));
    let huge = format!("x = {}.0", "9".repeat(400));
    assert!(matches!(
        tokenize(&huge),
        Err(LexError::FloatOverflow(ref text, Location { line: 1, column: 5 })) if text.len() == 402
    ));
    assert!(tokenize(&format!("{}.5", "9".repeat(300))).is_ok());
}

#[test]
fn test_tokenizer_continuation() {
    let mut tokenizer = Tokenizer::new();
    assert_eq!(
        tokenizer.tokenize(["(1 +"].iter()),
        TokenizerState::ContinuationNeeded
    );
    assert_eq!(tokenizer.tokenize(["2)"].iter()), TokenizerState::Ok);
    assert_eq!(tokenizer.finalize().unwrap().len(), 5);

    let mut tokenizer = Tokenizer::new();
    assert_eq!(
        tokenizer.tokenize(["/* still"].iter()),
        TokenizerState::ContinuationNeeded
    );
    assert_eq!(
        tokenizer.finalize(),
        Err(LexError::UnterminatedComment(Location { line: 1, column: 1 }))
    );
}

#[test]
fn test_precedence() {
    parse_tree_matches(
        "10 + 5 * 2",
        "BinaryOperation(Plus, (Literal(Integer(10)), BinaryOperation(Times, (Literal(Integer(5)), Literal(Integer(2))))))",
    );
    parse_tree_matches(
        "(10 + 5) * 2",
        "BinaryOperation(Times, (BinaryOperation(Plus, (Literal(Integer(10)), Literal(Integer(5)))), Literal(Integer(2))))",
    );
    parse_tree_matches("a / b + c", "BinaryOperation(Plus, (BinaryOperation(Divide");
}

#[test]
fn test_left_associativity() {
    parse_tree_matches(
        "1 - 2 - 3",
        "BinaryOperation(Minus, (BinaryOperation(Minus, (Literal(Integer(1)), Literal(Integer(2)))), Literal(Integer(3))))",
    );
    parse_tree_matches(
        "8 / 4 * 2",
        "BinaryOperation(Times, (BinaryOperation(Divide, (Literal(Integer(8)), Literal(Integer(4)))), Literal(Integer(2))))",
    );
}

#[test]
fn test_assignment() {
    parse_tree_matches("x = 5", "Assignment(Name(\"x\"), Literal(Integer(5)))");
    parse_tree_matches("y = x * 2", "Assignment(Name(\"y\"), BinaryOperation(Times");
    parse_tree_matches("x", "Expression(Name(Name(\"x\")))");
}

#[test]
fn test_collections() {
    parse_tree_matches(
        "[1, 2, 3]",
        "List([Literal(Integer(1)), Literal(Integer(2)), Literal(Integer(3))])",
    );
    parse_tree_matches("[]", "List([])");
    parse_tree_matches("{}", "Dict([])");
    parse_tree_matches(
        "{\"name\": \"Bob\", \"age\": 30}",
        "Dict([(Literal(String(\"name\")), Literal(String(\"Bob\"))), (Literal(String(\"age\")), Literal(Integer(30)))])",
    );
    parse_tree_matches("[[1], {}]", "List([List([Literal(Integer(1))]), Dict([])])");
    parse_tree_matches("[1 + 2]", "List([BinaryOperation(Plus");
}

#[test]
fn test_tree_equality_ignores_spans() {
    let tokens = tokenize("total = 1.5 + count").unwrap();
    let expected = Statement::Assignment(
        Name {
            name: "total".to_string(),
            span: Span::default(),
        },
        Expression::BinaryOperation(
            Operator::Plus,
            Box::new((
                literal(Value::Float(1.5)),
                Expression::Name(Name {
                    name: "count".to_string(),
                    span: Span::default(),
                }),
            )),
            Span::default(),
        ),
    );
    assert_eq!(parse(&tokens).unwrap(), expected);
}

#[test]
fn test_unexpected_token() {
    assert_eq!(
        parse_error("1 2"),
        ParseError::UnexpectedToken {
            found: "2".to_string(),
            expected: "one of '*', '/', '+', '-', end of input".to_string(),
            location: Location { line: 1, column: 3 },
        }
    );
    assert_eq!(
        parse_error("x 2"),
        ParseError::UnexpectedToken {
            found: "2".to_string(),
            expected: "one of '=', '*', '/', '+', '-', end of input".to_string(),
            location: Location { line: 1, column: 3 },
        }
    );
    assert!(matches!(
        parse_error("x = y = 3"),
        ParseError::UnexpectedToken { ref found, location: Location { line: 1, column: 7 }, .. } if found == "="
    ));
    assert!(matches!(
        parse_error("[1, 2,]"),
        ParseError::UnexpectedToken { ref found, .. } if found == "]"
    ));
    assert_eq!(
        parse_error("{1: 2}"),
        ParseError::UnexpectedToken {
            found: "1".to_string(),
            expected: "one of string, '}'".to_string(),
            location: Location { line: 1, column: 2 },
        }
    );
    assert!(matches!(
        parse_error("5 = x"),
        ParseError::UnexpectedToken { ref found, .. } if found == "="
    ));
}

#[test]
fn test_unexpected_end_of_input() {
    match parse_error("1 +") {
        ParseError::UnexpectedEndOfInput { expected, location } => {
            assert_eq!(location, Location { line: 1, column: 4 });
            assert!(expected.contains("integer"), "{expected}");
            assert!(expected.contains("'('"), "{expected}");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(matches!(
        parse_error("(1 + 2"),
        ParseError::UnexpectedEndOfInput { ref expected, .. } if expected.contains("')'")
    ));
    assert_eq!(
        parse(&[]),
        Err(ParseError::UnexpectedEndOfInput {
            expected: "one of identifier, integer, float, string, boolean, '[', '{', '('"
                .to_string(),
            location: Location { line: 1, column: 1 },
        })
    );
}

#[test]
fn test_parse_statement_leaves_rest() {
    let tokens = tokenize("x = 1 2 3").unwrap();
    let (statement, rest) = parse_statement(&tokens).unwrap();
    assert!(matches!(statement, Statement::Assignment(ref name, _) if name.as_str() == "x"));
    assert_eq!(rest.len(), 2);
    assert_eq!(rest[0].lexeme(), "2");
}

#[test]
fn test_nesting_limit() {
    parse_tree_matches(
        &format!("{}1{}", "(".repeat(100), ")".repeat(100)),
        "Expression(Literal(Integer(1)))",
    );
    assert_eq!(
        parse_error(&format!("{}1{}", "(".repeat(101), ")".repeat(101))),
        ParseError::UnexpectedToken {
            found: "(".to_string(),
            expected: "less deeply nested expression".to_string(),
            location: Location { line: 1, column: 101 },
        }
    );
    assert_eq!(parse_error(&"(".repeat(10_000)).location(), Location { line: 1, column: 101 });
    assert!(matches!(
        parse_error(&format!("x = {}", "[{\"k\": ".repeat(5_000))),
        ParseError::UnexpectedToken { ref found, ref expected, .. }
            if found == "[" && expected == "less deeply nested expression"
    ));
}

#[test]
fn test_nesting_limit_in_parse_statement() {
    let tokens = tokenize(&format!("a = {}", "(".repeat(200))).unwrap();
    assert!(matches!(
        parse_statement(&tokens),
        Err(ParseError::UnexpectedToken { ref expected, .. }) if expected == "less deeply nested expression"
    ));
}

#[test]
fn test_long_chain() {
    let source = vec!["x"; 100_000].join(" - ");
    let tokens = tokenize(&source).unwrap();
    let statement = parse(&tokens).unwrap();
    assert_eq!(statement.span(), Span::new(1, 1, 1, source.len() + 1));
    parse_tree_matches("a - b - c", "BinaryOperation(Minus, (BinaryOperation(Minus, (Name(Name(\"a\"))");
}
