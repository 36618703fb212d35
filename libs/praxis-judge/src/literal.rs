//! Parser for the literal/assignment fragments embedded in test fixtures.
//!
//! Fixture inputs look like `nums = [2,7,11,15], target = 9`; expected
//! outputs are bare literals like `[0,1]`. Fragments are parsed, never
//! evaluated, so pathological inputs are bounded by the size and depth
//! caps rather than a wall-clock timeout.

use praxis_common::error::{JudgeError, JudgeResult};
use serde_json::{Map, Number, Value};

/// Upper bound on fixture fragment size.
const MAX_INPUT_BYTES: usize = 64 * 1024;
/// Upper bound on literal nesting.
const MAX_DEPTH: usize = 64;

/// Name -> value assignments in first-seen declaration order.
///
/// Order matters: it is the positional fallback when assignment names do
/// not match the submitted code's own parameter names.
#[derive(Debug, Clone, Default)]
pub struct ParsedInput {
    entries: Vec<(String, Value)>,
}

impl ParsedInput {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Values in the order their names were first declared.
    pub fn values_in_order(&self) -> Vec<Value> {
        self.entries.iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }
}

/// Parse a bare literal (used for expected outputs and single-value
/// inputs).
pub fn parse_value(text: &str) -> JudgeResult<Value> {
    if text.len() > MAX_INPUT_BYTES {
        return Err(JudgeError::ParseFailure(format!(
            "literal exceeds {} bytes",
            MAX_INPUT_BYTES
        )));
    }
    let chars: Vec<char> = text.chars().collect();
    let mut parser = Parser { chars, pos: 0 };
    parser.skip_ws();
    let value = parser.value(0)?;
    parser.skip_ws();
    if parser.pos != parser.chars.len() {
        return Err(JudgeError::ParseFailure(format!(
            "unexpected trailing input at offset {}",
            parser.pos
        )));
    }
    Ok(value)
}

/// Scan a fixture line for `identifier = value` assignments.
///
/// Names are discovered lexically at bracket depth zero, outside string
/// literals, deduplicated in first-seen order. Each value fragment runs
/// until the start of the next assignment (minus the separating comma).
pub fn parse_assignments(text: &str) -> JudgeResult<ParsedInput> {
    if text.len() > MAX_INPUT_BYTES {
        return Err(JudgeError::ParseFailure(format!(
            "fixture input exceeds {} bytes",
            MAX_INPUT_BYTES
        )));
    }

    let chars: Vec<char> = text.chars().collect();
    let spans = assignment_spans(&chars);

    let mut parsed = ParsedInput::default();
    for (i, span) in spans.iter().enumerate() {
        let value_end = spans
            .get(i + 1)
            .map(|next| next.name_start)
            .unwrap_or(chars.len());
        let fragment: String = chars[span.value_start..value_end].iter().collect();
        let fragment = fragment.trim().trim_end_matches(',').trim();

        if parsed.contains(&span.name) {
            continue;
        }
        let value = parse_value(fragment).map_err(|e| {
            JudgeError::ParseFailure(format!("bad value for '{}': {}", span.name, e))
        })?;
        parsed.entries.push((span.name.clone(), value));
    }
    Ok(parsed)
}

struct AssignmentSpan {
    name: String,
    name_start: usize,
    value_start: usize,
}

/// Locate `ident =` occurrences at depth zero, skipping `==` and string
/// contents.
fn assignment_spans(chars: &[char]) -> Vec<AssignmentSpan> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '\'' | '"' => {
                i = skip_string(chars, i);
                continue;
            }
            '[' | '{' | '(' => depth += 1,
            ']' | '}' | ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 && (c.is_ascii_alphabetic() || c == '_') => {
                let name_start = i;
                let mut j = i + 1;
                while j < chars.len() && (chars[j].is_ascii_alphanumeric() || chars[j] == '_') {
                    j += 1;
                }
                let mut k = j;
                while k < chars.len() && chars[k].is_whitespace() {
                    k += 1;
                }
                if k < chars.len() && chars[k] == '=' && chars.get(k + 1) != Some(&'=') {
                    spans.push(AssignmentSpan {
                        name: chars[name_start..j].iter().collect(),
                        name_start,
                        value_start: k + 1,
                    });
                    i = k + 1;
                    continue;
                }
                i = j;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    spans
}

/// Advance past a string literal starting at `start`; returns the index
/// one past the closing quote (or end of input if unterminated).
fn skip_string(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    i
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn fail(&self, msg: &str) -> JudgeError {
        JudgeError::ParseFailure(format!("{} at offset {}", msg, self.pos))
    }

    fn value(&mut self, depth: usize) -> JudgeResult<Value> {
        if depth > MAX_DEPTH {
            return Err(JudgeError::ParseFailure(format!(
                "literal nesting exceeds depth {}",
                MAX_DEPTH
            )));
        }
        self.skip_ws();
        match self.peek() {
            Some('[') => self.array(depth),
            Some('{') => self.object(depth),
            Some('\'') | Some('"') => self.string().map(Value::String),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.word(),
            Some(_) => Err(self.fail("unexpected character")),
            None => Err(self.fail("unexpected end of input")),
        }
    }

    fn array(&mut self, depth: usize) -> JudgeResult<Value> {
        self.bump(); // '['
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(']') => {
                    self.bump();
                    return Ok(Value::Array(items));
                }
                None => return Err(self.fail("unterminated array")),
                _ => {}
            }
            items.push(self.value(depth + 1)?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                _ => return Err(self.fail("expected ',' or ']' in array")),
            }
        }
    }

    fn object(&mut self, depth: usize) -> JudgeResult<Value> {
        self.bump(); // '{'
        let mut map = Map::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some('}') => {
                    self.bump();
                    return Ok(Value::Object(map));
                }
                None => return Err(self.fail("unterminated object")),
                _ => {}
            }
            let key = match self.peek() {
                Some('\'') | Some('"') => self.string()?,
                Some(c) if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
                _ => return Err(self.fail("expected object key")),
            };
            self.skip_ws();
            if self.peek() != Some(':') {
                return Err(self.fail("expected ':' after object key"));
            }
            self.bump();
            let value = self.value(depth + 1)?;
            map.insert(key, value);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                _ => return Err(self.fail("expected ',' or '}' in object")),
            }
        }
    }

    fn string(&mut self) -> JudgeResult<String> {
        let quote = self.bump().unwrap();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.fail("unterminated string")),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some(c) => out.push(c),
                    None => return Err(self.fail("unterminated escape")),
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }

    fn identifier(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn word(&mut self) -> JudgeResult<Value> {
        let word = self.identifier();
        match word.as_str() {
            "true" | "True" => Ok(Value::Bool(true)),
            "false" | "False" => Ok(Value::Bool(false)),
            "null" | "None" => Ok(Value::Null),
            _ => Err(JudgeError::ParseFailure(format!(
                "unknown identifier '{}' in literal",
                word
            ))),
        }
    }

    fn number(&mut self) -> JudgeResult<Value> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {
                    self.bump();
                }
                '.' | 'e' | 'E' => {
                    is_float = true;
                    self.bump();
                    if matches!(self.peek(), Some('+') | Some('-')) {
                        self.bump();
                    }
                }
                _ => break,
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if is_float {
            let f: f64 = text
                .parse()
                .map_err(|_| JudgeError::ParseFailure(format!("bad number '{}'", text)))?;
            Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| JudgeError::ParseFailure(format!("non-finite number '{}'", text)))
        } else {
            let n: i64 = text
                .parse()
                .map_err(|_| JudgeError::ParseFailure(format!("bad number '{}'", text)))?;
            Ok(Value::Number(n.into()))
        }
    }
}
