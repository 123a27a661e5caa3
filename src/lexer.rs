//! A module implementing lexical analysis (tokenization) for the Compass command language.
//!
//! Tokenization is total: every character of the input ends up either inside a
//! token, discarded as whitespace, or wrapped in a [`Token::Mismatch`] so the
//! engine can report it. [`tokenize`] never fails.

use std::fmt;

/// Reserved words of the language.
///
/// `clear` and `exit` are deliberately absent: they reach the engine as plain
/// identifiers and are recognized there, matching the command set in
/// [`crate::Interpreter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Set,
    To,
    Print,
    Add,
    Sub,
    Mult,
    Div,
    If,
    Else,
    Help,
}

impl Keyword {
    /// The lowercase source form of the keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Set => "set",
            Keyword::To => "to",
            Keyword::Print => "print",
            Keyword::Add => "add",
            Keyword::Sub => "sub",
            Keyword::Mult => "mult",
            Keyword::Div => "div",
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::Help => "help",
        }
    }

    fn from_word(word: &str) -> Option<Keyword> {
        let kw = match word {
            "set" => Keyword::Set,
            "to" => Keyword::To,
            "print" => Keyword::Print,
            "add" => Keyword::Add,
            "sub" => Keyword::Sub,
            "mult" => Keyword::Mult,
            "div" => Keyword::Div,
            "if" => Keyword::If,
            "else" => Keyword::Else,
            "help" => Keyword::Help,
            _ => return None,
        };
        Some(kw)
    }
}

/// Comparison operators accepted in `if` conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Ge,
    /// `<=`
    Le,
}

impl CmpOp {
    /// The source form of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Gt => ">",
            CmpOp::Lt => "<",
            CmpOp::Ge => ">=",
            CmpOp::Le => "<=",
        }
    }
}

/// A classified lexical unit produced from one line of input.
///
/// Every textual payload except string contents is lowercased by the scanner,
/// so identifiers are effectively case-insensitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A run of decimal digits, parsed.
    Number(i64),
    /// A quoted span with the surrounding quotes stripped; contents keep their case.
    Str(String),
    /// One of the reserved words, matched as a whole word.
    Keyword(Keyword),
    /// A name: letter or underscore, then letters, digits or underscores.
    Ident(String),
    /// A comparison operator.
    Op(CmpOp),
    /// The `:` separating an `if` condition from its inline command.
    Colon,
    /// The `;` statement separator.
    Semicolon,
    /// A single character no rule recognized. Kept so the engine can name it
    /// in a diagnostic instead of dropping it silently.
    Mismatch(char),
}

impl fmt::Display for Token {
    /// The token's lexeme, used when a diagnostic needs to name the offender.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Str(s) => write!(f, "{s}"),
            Token::Keyword(kw) => write!(f, "{}", kw.as_str()),
            Token::Ident(name) => write!(f, "{name}"),
            Token::Op(op) => write!(f, "{}", op.as_str()),
            Token::Colon => write!(f, ":"),
            Token::Semicolon => write!(f, ";"),
            Token::Mismatch(c) => write!(f, "{c}"),
        }
    }
}

/// Character-level scanner over one line of input.
///
/// Rules are tried in a fixed priority order: whitespace, numbers, strings,
/// words (keywords before identifiers), operators longest-first, punctuation,
/// and finally the single-character mismatch fallback. The ordering matters:
/// `>=` must not split into `>` `=`, and `set` must not lex as an identifier.
struct Scanner {
    input: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn new(line: &str) -> Self {
        Scanner {
            input: line.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn scan(mut self) -> Vec<Token> {
        let mut out = Vec::new();
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\n' | '\r' => {
                    self.bump();
                }
                '0'..='9' => out.push(self.scan_number()),
                '"' | '\'' => out.push(self.scan_string(ch)),
                c if c.is_ascii_alphabetic() || c == '_' => out.push(self.scan_word()),
                '=' | '!' | '>' | '<' => out.push(self.scan_operator(ch)),
                ':' => {
                    self.bump();
                    out.push(Token::Colon);
                }
                ';' => {
                    self.bump();
                    out.push(Token::Semicolon);
                }
                c => {
                    self.bump();
                    out.push(Token::Mismatch(c));
                }
            }
        }
        out
    }

    fn scan_number(&mut self) -> Token {
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.bump();
            } else {
                break;
            }
        }
        // Digit runs that do not fit in i64 keep their textual form; the
        // engine's coercion rules then treat them like any other text.
        match digits.parse::<i64>() {
            Ok(n) => Token::Number(n),
            Err(_) => Token::Str(digits),
        }
    }

    /// Scans a quoted span. No escape processing: the span ends at the first
    /// matching quote. An unterminated quote is emitted as a mismatch and
    /// scanning resumes right after it, keeping the lexer total.
    fn scan_string(&mut self, quote: char) -> Token {
        let start = self.pos;
        self.bump(); // opening quote
        let mut content = String::new();
        while let Some(c) = self.bump() {
            if c == quote {
                return Token::Str(content);
            }
            content.push(c);
        }
        self.pos = start + 1;
        Token::Mismatch(quote)
    }

    fn scan_word(&mut self) -> Token {
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                word.push(c.to_ascii_lowercase());
                self.bump();
            } else {
                break;
            }
        }
        match Keyword::from_word(&word) {
            Some(kw) => Token::Keyword(kw),
            None => Token::Ident(word),
        }
    }

    fn scan_operator(&mut self, first: char) -> Token {
        self.bump();
        let eq_follows = self.peek() == Some('=');
        match (first, eq_follows) {
            ('=', true) => {
                self.bump();
                Token::Op(CmpOp::Eq)
            }
            ('!', true) => {
                self.bump();
                Token::Op(CmpOp::Ne)
            }
            ('>', true) => {
                self.bump();
                Token::Op(CmpOp::Ge)
            }
            ('<', true) => {
                self.bump();
                Token::Op(CmpOp::Le)
            }
            ('>', false) => Token::Op(CmpOp::Gt),
            ('<', false) => Token::Op(CmpOp::Lt),
            // A lone `=` or `!` matches no rule.
            (c, _) => Token::Mismatch(c),
        }
    }
}

/// Tokenizes one line of input.
///
/// This is a total function: malformed input produces [`Token::Mismatch`]
/// entries rather than an error. Whitespace is discarded and never emitted.
pub fn tokenize(line: &str) -> Vec<Token> {
    Scanner::new(line).scan()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_assignment_line() {
        let tokens = tokenize("set x to 10");
        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::Set),
                Token::Ident("x".to_string()),
                Token::Keyword(Keyword::To),
                Token::Number(10),
            ]
        );
    }

    #[test]
    fn input_is_lowercased() {
        let tokens = tokenize("SET Counter TO 5");
        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::Set),
                Token::Ident("counter".to_string()),
                Token::Keyword(Keyword::To),
                Token::Number(5),
            ]
        );
    }

    #[test]
    fn keywords_match_whole_words_only() {
        assert_eq!(tokenize("settle"), vec![Token::Ident("settle".to_string())]);
        assert_eq!(tokenize("toto"), vec![Token::Ident("toto".to_string())]);
        assert_eq!(tokenize("printer"), vec![Token::Ident("printer".to_string())]);
    }

    #[test]
    fn multi_char_operators_win_over_prefixes() {
        let tokens = tokenize(">= <= == != > <");
        assert_eq!(
            tokens,
            vec![
                Token::Op(CmpOp::Ge),
                Token::Op(CmpOp::Le),
                Token::Op(CmpOp::Eq),
                Token::Op(CmpOp::Ne),
                Token::Op(CmpOp::Gt),
                Token::Op(CmpOp::Lt),
            ]
        );
    }

    #[test]
    fn lone_equals_and_bang_are_mismatches() {
        assert_eq!(tokenize("="), vec![Token::Mismatch('=')]);
        assert_eq!(tokenize("!"), vec![Token::Mismatch('!')]);
        assert_eq!(tokenize("?"), vec![Token::Mismatch('?')]);
    }

    #[test]
    fn strings_strip_quotes_and_keep_case() {
        assert_eq!(
            tokenize("\"Hello World\""),
            vec![Token::Str("Hello World".to_string())]
        );
        assert_eq!(
            tokenize("'single Quoted'"),
            vec![Token::Str("single Quoted".to_string())]
        );
    }

    #[test]
    fn unterminated_quote_becomes_mismatch() {
        let tokens = tokenize("\"abc");
        assert_eq!(
            tokens,
            vec![Token::Mismatch('"'), Token::Ident("abc".to_string())]
        );
    }

    #[test]
    fn condition_line_without_spaces() {
        let tokens = tokenize("if x>5: print x");
        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::If),
                Token::Ident("x".to_string()),
                Token::Op(CmpOp::Gt),
                Token::Number(5),
                Token::Colon,
                Token::Keyword(Keyword::Print),
                Token::Ident("x".to_string()),
            ]
        );
    }

    #[test]
    fn whitespace_only_line_yields_no_tokens() {
        assert_eq!(tokenize("   \t  "), Vec::<Token>::new());
        assert_eq!(tokenize(""), Vec::<Token>::new());
    }

    #[test]
    fn punctuation_tokens() {
        assert_eq!(tokenize("; :"), vec![Token::Semicolon, Token::Colon]);
    }

    #[test]
    fn oversized_digit_run_stays_textual() {
        let tokens = tokenize("99999999999999999999999999");
        assert_eq!(
            tokens,
            vec![Token::Str("99999999999999999999999999".to_string())]
        );
    }

    #[test]
    fn token_stream_is_deterministic() {
        let line = "if total >= 100 : print total";
        assert_eq!(tokenize(line), tokenize(line));
    }
}
