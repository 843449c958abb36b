//! Unit tests for the filter expression lexer

use arcadex_filter::lexer::{tokenize, Lexer};
use arcadex_filter::token::{Keyword, LiteralKind, Token, TokenType};
use arcadex_filter::Error;

fn types(input: &str) -> Vec<TokenType> {
    tokenize(input)
        .unwrap()
        .into_iter()
        .map(|t| t.token_type)
        .collect()
}

#[test]
fn test_blank_input() {
    assert!(tokenize("").unwrap().is_empty());
    assert!(tokenize("  \t\n ").unwrap().is_empty());
}

#[test]
fn test_string_literal_doubling() {
    let tokens = tokenize("'it''s'").unwrap();
    assert_eq!(tokens, vec![Token::literal(LiteralKind::String, "it's")]);

    let tokens = tokenize("''").unwrap();
    assert_eq!(tokens, vec![Token::literal(LiteralKind::String, "")]);
}

#[test]
fn test_regex_literal() {
    let tokens = tokenize("/^Ar.*/").unwrap();
    assert_eq!(tokens, vec![Token::literal(LiteralKind::Regex, "^Ar.*")]);

    let tokens = tokenize(r"/a\/b/").unwrap();
    assert_eq!(tokens[0].value, "a/b");

    let tokens = tokenize(r"/\d+/").unwrap();
    assert_eq!(tokens[0].value, r"\d+");
}

#[test]
fn test_unterminated_literals() {
    for input in ["'abc", "name = 'abc", "/abc", "\"abc", "[abc", "'it''"] {
        assert!(
            matches!(tokenize(input), Err(Error::LexError(_))),
            "expected lex error for {:?}",
            input
        );
    }
}

#[test]
fn test_comparison_symbols() {
    let cases = [
        ("=", Keyword::Equal),
        ("==", Keyword::DoubleEqual),
        ("<>", Keyword::NotEqual),
        ("!=", Keyword::BangEqual),
        ("<", Keyword::LessThan),
        ("<=", Keyword::LessOrEqual),
        (">", Keyword::GreaterThan),
        (">=", Keyword::GreaterOrEqual),
    ];
    for (symbol, keyword) in cases {
        let input = format!("year{}1990", symbol);
        assert_eq!(
            types(&input),
            vec![
                TokenType::Identifier,
                TokenType::Operator(keyword),
                TokenType::Literal(LiteralKind::Number),
            ],
            "input {:?}",
            input
        );
    }
}

#[test]
fn test_keywords_case_insensitive() {
    let tokens = tokenize("name like 'x' Or year Is not null").unwrap();
    assert_eq!(tokens[1].token_type, TokenType::Operator(Keyword::Like));
    assert_eq!(tokens[1].value, "LIKE");
    assert_eq!(tokens[3].token_type, TokenType::Operator(Keyword::Or));
    assert_eq!(tokens[5].token_type, TokenType::Operator(Keyword::Is));
    assert_eq!(tokens[6].token_type, TokenType::Operator(Keyword::Not));
    assert_eq!(tokens[7], Token::literal(LiteralKind::Null, "NULL"));
}

#[test]
fn test_parentheses() {
    assert_eq!(
        types("(a)"),
        vec![
            TokenType::OpenParen,
            TokenType::Identifier,
            TokenType::CloseParen
        ]
    );
}

#[test]
fn test_numbers() {
    let tokens = tokenize("year > -5").unwrap();
    assert_eq!(tokens[2], Token::literal(LiteralKind::Number, "-5"));

    let tokens = tokenize("refresh >= 59.94").unwrap();
    assert_eq!(tokens[2], Token::literal(LiteralKind::Number, "59.94"));
}

#[test]
fn test_dotted_and_quoted_identifiers() {
    assert_eq!(tokenize("Games.year").unwrap(), vec![Token::identifier("Games.year")]);
    assert_eq!(
        tokenize("\"Play Count\"").unwrap(),
        vec![Token::identifier("Play Count")]
    );
    assert_eq!(tokenize("`name`").unwrap(), vec![Token::identifier("name")]);
    assert_eq!(
        tokenize("[Games].[name]").unwrap(),
        vec![Token::identifier("Games.name")]
    );
    assert_eq!(
        tokenize("Games.\"name\"").unwrap(),
        vec![Token::identifier("Games.name")]
    );
    assert_eq!(
        tokenize("\"odd \"\"name\"\"\"").unwrap(),
        vec![Token::identifier("odd \"name\"")]
    );
}

#[test]
fn test_lenient_bare_literals() {
    let tokens = tokenize("3D ! Pac%").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::literal(LiteralKind::Bare, "3D"),
            Token::literal(LiteralKind::Bare, "!"),
            Token::literal(LiteralKind::Bare, "Pac%"),
        ]
    );
}

#[test]
fn test_next_token_stream() {
    let mut lexer = Lexer::new("a = 1");
    assert_eq!(lexer.next_token().unwrap(), Some(Token::identifier("a")));
    assert!(lexer.next_token().unwrap().is_some());
    assert!(lexer.next_token().unwrap().is_some());
    assert_eq!(lexer.next_token().unwrap(), None);
    assert_eq!(lexer.next_token().unwrap(), None);
}
