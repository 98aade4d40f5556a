//! Recursive-descent JSON parser producing a [`Value`] tree.
//!
//! The parser walks a byte cursor over the whole document. `parse_value`
//! dispatches on the next significant byte and objects and arrays recurse
//! through it, so commas, colons and braces inside strings need no special
//! handling and nesting depth is uniform. Every failure carries the byte
//! offset where it was detected; the parser never guesses its way past an
//! error.
//!
//! # Key design decisions
//!
//! - **Literal numbers**: number tokens are validated against the JSON
//!   grammar but kept as text, so the deserializer can build decimals without
//!   a floating-point round trip.
//! - **Run copying**: string bodies are copied in runs between escapes.
//!   `"` and `\` are ASCII, so every slice boundary is a char boundary.
//! - **Explicit depth**: recursion is bounded by [`Limits::max_nesting_depth`].

use std::collections::HashSet;

use crate::error::{MapperError, Result};
use crate::limits::Limits;
use crate::value::Value;

/// Parse a complete JSON document with the default [`Limits`].
///
/// # Example
/// ```
/// use jsonisator_core::{parse_value, Value};
/// let value = parse_value(r#"{"note": "a, b: {c}"}"#).unwrap();
/// assert_eq!(value.get("note"), Some(&Value::Str("a, b: {c}".to_string())));
/// ```
pub fn parse_value(text: &str) -> Result<Value> {
    parse_value_with_limits(text, Limits::default())
}

/// Parse a complete JSON document. Trailing input after the top-level value
/// is an error.
pub fn parse_value_with_limits(text: &str, limits: Limits) -> Result<Value> {
    if text.len() > limits.max_input_size {
        return Err(MapperError::InputTooLarge {
            len: text.len(),
            max: limits.max_input_size,
        });
    }
    Parser::new(text, limits).parse_document()
}

/// One object member, scanned before it is folded into the member list.
struct Node {
    key: String,
    offset: usize,
    value: Value,
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
    limits: Limits,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, limits: Limits) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
            limits,
        }
    }

    fn parse_document(&mut self) -> Result<Value> {
        if self.src.starts_with('\u{feff}') {
            self.pos = '\u{feff}'.len_utf8();
        }
        let value = self.parse_value()?;
        self.skip_whitespace();
        if self.pos < self.src.len() {
            return Err(self.error("end of input"));
        }
        Ok(value)
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    /// Describe what sits at the cursor, for error messages.
    fn found(&self) -> String {
        match self.src.get(self.pos..).and_then(|rest| rest.chars().next()) {
            Some(c) if c.is_control() => format!("{:?}", c),
            Some(c) => format!("`{}`", c),
            None => "end of input".to_string(),
        }
    }

    fn error(&self, expected: &str) -> MapperError {
        MapperError::Syntax {
            offset: self.pos,
            expected: expected.to_string(),
            found: self.found(),
        }
    }

    fn expect(&mut self, byte: u8, expected: &str) -> Result<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(expected))
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.limits.max_nesting_depth {
            return Err(MapperError::NestingTooDeep {
                offset: self.pos,
                max: self.limits.max_nesting_depth,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_whitespace();
        match self.peek() {
            Some(b'{') => self.parse_object(),
            Some(b'[') => self.parse_array(),
            Some(b'"') => self.parse_string().map(Value::Str),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(b't') => self.parse_literal("true", Value::Bool(true)),
            Some(b'f') => self.parse_literal("false", Value::Bool(false)),
            Some(b'n') => self.parse_literal("null", Value::Null),
            _ => Err(self.error("a JSON value")),
        }
    }

    fn parse_literal(&mut self, word: &str, value: Value) -> Result<Value> {
        if self.src[self.pos..].starts_with(word) {
            self.pos += word.len();
            Ok(value)
        } else {
            Err(self.error(&format!("`{}`", word)))
        }
    }

    fn parse_object(&mut self) -> Result<Value> {
        self.enter()?;
        self.pos += 1; // `{`

        let mut members: Vec<(String, Value)> = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            self.leave();
            return Ok(Value::Object(members));
        }

        let mut seen: HashSet<String> = HashSet::new();
        loop {
            let node = self.parse_member()?;
            if !seen.insert(node.key.clone()) {
                return Err(MapperError::Syntax {
                    offset: node.offset,
                    expected: "a unique key".to_string(),
                    found: format!("duplicate key {:?}", node.key),
                });
            }
            members.push((node.key, node.value));

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.error("`,` or `}`")),
            }
        }

        self.leave();
        Ok(Value::Object(members))
    }

    fn parse_member(&mut self) -> Result<Node> {
        self.skip_whitespace();
        let offset = self.pos;
        if self.peek() != Some(b'"') {
            return Err(self.error("a quoted key"));
        }
        let key = self.parse_string()?;
        self.skip_whitespace();
        self.expect(b':', "`:`")?;
        let value = self.parse_value()?;
        Ok(Node { key, offset, value })
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.enter()?;
        self.pos += 1; // `[`

        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            self.leave();
            return Ok(Value::Array(items));
        }

        loop {
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.error("`,` or `]`")),
            }
        }

        self.leave();
        Ok(Value::Array(items))
    }

    /// Parse a quoted string starting at the opening quote and return its
    /// unescaped contents.
    fn parse_string(&mut self) -> Result<String> {
        let src = self.src;
        let start = self.pos;
        self.pos += 1; // opening quote
        let mut out = String::new();

        loop {
            let run_start = self.pos;
            while let Some(b) = self.peek() {
                if b == b'"' || b == b'\\' || b < 0x20 {
                    break;
                }
                self.pos += 1;
            }
            out.push_str(&src[run_start..self.pos]);

            match self.peek() {
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => {
                    self.pos += 1;
                    self.parse_escape(&mut out)?;
                }
                Some(_) => return Err(self.error("an escaped control character")),
                None => {
                    return Err(MapperError::Syntax {
                        offset: start,
                        expected: "a closing `\"`".to_string(),
                        found: "end of input".to_string(),
                    })
                }
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<()> {
        let escaped = match self.peek() {
            Some(b'"') => '"',
            Some(b'\\') => '\\',
            Some(b'/') => '/',
            Some(b'b') => '\u{0008}',
            Some(b'f') => '\u{000c}',
            Some(b'n') => '\n',
            Some(b'r') => '\r',
            Some(b't') => '\t',
            Some(b'u') => {
                self.pos += 1;
                let c = self.parse_unicode_escape()?;
                out.push(c);
                return Ok(());
            }
            _ => return Err(self.error("a valid escape character")),
        };
        self.pos += 1;
        out.push(escaped);
        Ok(())
    }

    /// Decode the digits of a `\u` escape, combining surrogate pairs.
    fn parse_unicode_escape(&mut self) -> Result<char> {
        let escape_start = self.pos;
        let high = self.parse_hex4()?;
        let code = match high {
            0xD800..=0xDBFF => {
                if !self.src[self.pos..].starts_with("\\u") {
                    return Err(self.error("a `\\u` low surrogate"));
                }
                self.pos += 2;
                let low = self.parse_hex4()?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(MapperError::Syntax {
                        offset: escape_start,
                        expected: "a low surrogate".to_string(),
                        found: format!("\\u{:04x}", low),
                    });
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => {
                return Err(MapperError::Syntax {
                    offset: escape_start,
                    expected: "a high surrogate first".to_string(),
                    found: format!("\\u{:04x}", high),
                });
            }
            _ => high,
        };
        char::from_u32(code).ok_or_else(|| MapperError::Syntax {
            offset: escape_start,
            expected: "a Unicode scalar value".to_string(),
            found: format!("U+{:X}", code),
        })
    }

    fn parse_hex4(&mut self) -> Result<u32> {
        let src = self.src;
        let digits = src
            .get(self.pos..self.pos + 4)
            .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()));
        let Some(digits) = digits else {
            return Err(self.error("four hex digits"));
        };
        let code = u32::from_str_radix(digits, 16).map_err(|_| self.error("four hex digits"))?;
        self.pos += 4;
        Ok(code)
    }

    fn parse_number(&mut self) -> Result<Value> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => self.skip_digits(),
            _ => return Err(self.error("a digit")),
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            self.expect_digits("a digit after `.`")?;
        }
        if let Some(b'e' | b'E') = self.peek() {
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            self.expect_digits("an exponent digit")?;
        }
        Ok(Value::Number(self.src[start..self.pos].to_string()))
    }

    fn expect_digits(&mut self, expected: &str) -> Result<()> {
        if !self.peek().is_some_and(|b| b.is_ascii_digit()) {
            return Err(self.error(expected));
        }
        self.skip_digits();
        Ok(())
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
    }
}
