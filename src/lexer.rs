//! JSON tokenizer.
//!
//! Scans raw bytes and yields one lexical token at a time with no
//! lookahead beyond the current token. Whitespace (space, tab, LF, CR) is
//! skipped before each token. String bodies are decoded through
//! [`crate::utf8::StringDecoder`], so a `Token::String` payload is always
//! valid UTF-8 with escapes resolved and surrogate pairs collated. Number
//! tokens carry the raw lexeme; the type decision is deferred to the
//! classifier.

use crate::error::{Error, JsonResult};
use crate::limits::Limits;
use crate::utf8::StringDecoder;

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Left brace `{`
    LeftBrace,
    /// Right brace `}`
    RightBrace,
    /// Left bracket `[`
    LeftBracket,
    /// Right bracket `]`
    RightBracket,
    /// Colon `:`
    Colon,
    /// Comma `,`
    Comma,
    /// Null literal
    Null,
    /// True literal
    True,
    /// False literal
    False,
    /// Number value, as the raw matched lexeme
    Number(String),
    /// String value, decoded
    String(String),
    /// End of input
    Eof,
}

impl Token {
    /// True for tokens that are complete scalar values by themselves.
    pub fn is_scalar_value(&self) -> bool {
        matches!(
            self,
            Token::Null | Token::True | Token::False | Token::Number(_) | Token::String(_)
        )
    }
}

/// Tokenizer over a byte buffer.
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a lexer, enforcing the input-size bound up front.
    pub fn new(input: &'a [u8], limits: Limits) -> JsonResult<Self> {
        if let Some(max_size) = limits.max_input_size {
            if input.len() as u64 > max_size {
                return Err(Error::InputTooLarge {
                    size: input.len() as u64,
                    max_size,
                });
            }
        }
        Ok(Self { input, pos: 0 })
    }

    /// Current byte offset into the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.input.get(self.pos).copied();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    /// Read the next token from the input.
    pub fn next_token(&mut self) -> JsonResult<Token> {
        self.skip_whitespace();

        match self.peek() {
            None => Ok(Token::Eof),
            Some(b'{') => {
                self.pos += 1;
                Ok(Token::LeftBrace)
            }
            Some(b'}') => {
                self.pos += 1;
                Ok(Token::RightBrace)
            }
            Some(b'[') => {
                self.pos += 1;
                Ok(Token::LeftBracket)
            }
            Some(b']') => {
                self.pos += 1;
                Ok(Token::RightBracket)
            }
            Some(b':') => {
                self.pos += 1;
                Ok(Token::Colon)
            }
            Some(b',') => {
                self.pos += 1;
                Ok(Token::Comma)
            }
            Some(b'"') => self.read_string(),
            Some(b'-' | b'0'..=b'9') => self.read_number(),
            Some(b'n') => self.read_keyword(b"null", Token::Null),
            Some(b't') => self.read_keyword(b"true", Token::True),
            Some(b'f') => self.read_keyword(b"false", Token::False),
            Some(b) => Err(Error::Lexical(format!(
                "unexpected byte 0x{b:02x} at offset {}",
                self.pos
            ))),
        }
    }

    /// Read a string token, decoding escapes and validating UTF-8.
    fn read_string(&mut self) -> JsonResult<Token> {
        // Consume opening quote.
        self.pos += 1;

        let mut decoder = StringDecoder::new();
        loop {
            match self.advance() {
                None => return Err(Error::Lexical("unterminated string".to_string())),
                Some(b'"') => return decoder.finish().map(Token::String),
                Some(b'\\') => self.read_escape(&mut decoder)?,
                Some(b) if b < 0x20 => {
                    return Err(Error::Lexical(format!(
                        "unescaped control byte 0x{b:02x} in string"
                    )));
                }
                Some(b) => decoder.push_byte(b)?,
            }
        }
    }

    /// Read one escape sequence after a backslash.
    fn read_escape(&mut self, decoder: &mut StringDecoder) -> JsonResult<()> {
        match self.advance() {
            None => Err(Error::Lexical("unterminated string escape".to_string())),
            Some(b'"') => decoder.push_byte(b'"'),
            Some(b'\\') => decoder.push_byte(b'\\'),
            Some(b'/') => decoder.push_byte(b'/'),
            Some(b'b') => decoder.push_byte(0x08),
            Some(b'f') => decoder.push_byte(0x0C),
            Some(b'n') => decoder.push_byte(b'\n'),
            Some(b'r') => decoder.push_byte(b'\r'),
            Some(b't') => decoder.push_byte(b'\t'),
            Some(b'u') => {
                let unit = self.read_hex4()?;
                decoder.push_unit(unit)
            }
            Some(b) => Err(Error::Lexical(format!(
                "invalid escape character 0x{b:02x}"
            ))),
        }
    }

    /// Read 4 hex digits of a `\uXXXX` escape.
    fn read_hex4(&mut self) -> JsonResult<u16> {
        let mut value: u16 = 0;
        for _ in 0..4 {
            let b = self
                .advance()
                .ok_or_else(|| Error::Lexical("truncated \\u escape".to_string()))?;
            let digit = match b {
                b'0'..=b'9' => b - b'0',
                b'a'..=b'f' => b - b'a' + 10,
                b'A'..=b'F' => b - b'A' + 10,
                _ => {
                    return Err(Error::Lexical(format!(
                        "invalid hex digit 0x{b:02x} in \\u escape"
                    )));
                }
            };
            value = (value << 4) | u16::from(digit);
        }
        Ok(value)
    }

    /// Read a number token, matching the JSON grammar exactly. The raw
    /// lexeme is returned unconverted.
    fn read_number(&mut self) -> JsonResult<Token> {
        let start = self.pos;

        if self.peek() == Some(b'-') {
            self.pos += 1;
        }

        // Integer part: a single 0, or a nonzero digit followed by digits.
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                if let Some(b'0'..=b'9') = self.peek() {
                    return Err(Error::Lexical(
                        "number has a leading zero".to_string(),
                    ));
                }
            }
            Some(b'1'..=b'9') => {
                while let Some(b'0'..=b'9') = self.peek() {
                    self.pos += 1;
                }
            }
            _ => {
                return Err(Error::Lexical(
                    "'-' not followed by a digit".to_string(),
                ));
            }
        }

        // Fractional part.
        if self.peek() == Some(b'.') {
            self.pos += 1;
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(Error::Lexical(
                    "decimal point not followed by a digit".to_string(),
                ));
            }
            while let Some(b'0'..=b'9') = self.peek() {
                self.pos += 1;
            }
        }

        // Exponent.
        if let Some(b'e' | b'E') = self.peek() {
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(Error::Lexical(
                    "exponent has no digits".to_string(),
                ));
            }
            while let Some(b'0'..=b'9') = self.peek() {
                self.pos += 1;
            }
        }

        let lexeme = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| Error::InternalInvariant("number lexeme is not ascii".to_string()))?;
        Ok(Token::Number(lexeme.to_string()))
    }

    /// Match a keyword literal byte-for-byte.
    fn read_keyword(&mut self, expected: &[u8], token: Token) -> JsonResult<Token> {
        for &b in expected {
            if self.advance() != Some(b) {
                return Err(Error::Lexical(format!(
                    "unknown keyword, expected '{}'",
                    String::from_utf8_lossy(expected)
                )));
            }
        }
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> JsonResult<Vec<Token>> {
        let mut lexer = Lexer::new(input.as_bytes(), Limits::standard())?;
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            if token == Token::Eof {
                break;
            }
            tokens.push(token);
        }
        Ok(tokens)
    }

    #[test]
    fn test_structural_tokens() {
        let tokens = lex("{}[],:").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::LeftBrace,
                Token::RightBrace,
                Token::LeftBracket,
                Token::RightBracket,
                Token::Comma,
                Token::Colon,
            ]
        );
    }

    #[test]
    fn test_keywords() {
        let tokens = lex("null true false").unwrap();
        assert_eq!(tokens, vec![Token::Null, Token::True, Token::False]);
    }

    #[test]
    fn test_partial_keyword_rejected() {
        assert!(lex("nul").is_err());
        assert!(lex("truth").is_err());
        assert!(lex("fals").is_err());
    }

    #[test]
    fn test_whitespace_skipped() {
        let tokens = lex(" \t\r\n null \n").unwrap();
        assert_eq!(tokens, vec![Token::Null]);
    }

    #[test]
    fn test_string_plain_and_escapes() {
        let tokens = lex(r#""a\nb\tc\"d\\e\/f""#).unwrap();
        assert_eq!(tokens, vec![Token::String("a\nb\tc\"d\\e/f".to_string())]);
    }

    #[test]
    fn test_string_unicode_escape() {
        let tokens = lex("\"\\u0041\\u00e9\"").unwrap();
        assert_eq!(tokens, vec![Token::String("Aé".to_string())]);
    }

    #[test]
    fn test_string_raw_multibyte_passthrough() {
        let tokens = lex("\"héllo 𝄞\"").unwrap();
        assert_eq!(tokens, vec![Token::String("héllo 𝄞".to_string())]);
    }

    #[test]
    fn test_string_surrogate_pair_escape() {
        let tokens = lex("\"\\uD834\\uDD1E\"").unwrap();
        assert_eq!(tokens, vec![Token::String("\u{1D11E}".to_string())]);
    }

    #[test]
    fn test_lone_surrogate_rejected() {
        let err = lex(r#""\uD834""#).unwrap_err();
        assert!(err.is_lexical());
    }

    #[test]
    fn test_unterminated_string_rejected() {
        assert!(lex(r#""abc"#).is_err());
        assert!(lex(r#""abc\"#).is_err());
    }

    #[test]
    fn test_control_byte_in_string_rejected() {
        assert!(lex("\"a\nb\"").is_err());
    }

    #[test]
    fn test_invalid_escape_rejected() {
        assert!(lex(r#""\q""#).is_err());
        assert!(lex(r#""\u12g4""#).is_err());
    }

    #[test]
    fn test_number_lexemes_kept_raw() {
        let tokens = lex("0 -0 42 -123 0.5 1e10 -1.5e-3 1E+2").unwrap();
        let lexemes: Vec<&str> = tokens
            .iter()
            .map(|t| match t {
                Token::Number(s) => s.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(
            lexemes,
            ["0", "-0", "42", "-123", "0.5", "1e10", "-1.5e-3", "1E+2"]
        );
    }

    #[test]
    fn test_malformed_numbers_rejected() {
        assert!(lex("01").is_err());
        assert!(lex("1.").is_err());
        assert!(lex("-").is_err());
        assert!(lex("-x").is_err());
        assert!(lex("1e").is_err());
        assert!(lex("1e+").is_err());
        // '.1' and '+1' fail at the first byte, which starts no token.
        assert!(lex(".1").is_err());
        assert!(lex("+1").is_err());
    }

    #[test]
    fn test_number_stops_at_delimiter() {
        let tokens = lex("[1,2]").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::LeftBracket,
                Token::Number("1".to_string()),
                Token::Comma,
                Token::Number("2".to_string()),
                Token::RightBracket,
            ]
        );
    }

    #[test]
    fn test_input_size_bound() {
        let limits = Limits::standard().with_max_input_size(Some(4));
        let result = Lexer::new(b"[1,2,3]", limits);
        assert!(matches!(
            result,
            Err(Error::InputTooLarge { size: 7, max_size: 4 })
        ));
    }

    #[test]
    fn test_scalar_value_predicate() {
        assert!(Token::Null.is_scalar_value());
        assert!(Token::Number("1".to_string()).is_scalar_value());
        assert!(!Token::LeftBrace.is_scalar_value());
        assert!(!Token::Comma.is_scalar_value());
    }
}
