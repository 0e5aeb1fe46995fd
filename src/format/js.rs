// src/format/js.rs

//! The JS flavour of descriptor files.
//!
//! Descriptor files are usually hand-written CommonJS modules:
//!
//! ```js
//! module.exports = {
//!     apps: [
//!         { name: 'cron_worker', script: '/app/dist/main.js', instances: 1 },
//!     ],
//! };
//! ```
//!
//! Only the data subset of JS is understood: object and array literals, bare
//! or quoted keys, single or double quoted strings, numbers, `true`, `false`,
//! `null`, trailing commas, comments and a leading `'use strict';`. Numbers
//! with no fractional part (`1e1`, `10.0`) are integers, as in JS. Anything computed (function calls,
//! `require`, template strings, spreads) is a syntax error. The parser builds a
//! `serde_json::Value`, which the regular serde model then deserializes.

use std::fmt::Write as _;

use serde_json::{Map, Number, Value};

use crate::config::model::{ProcessSpec, RawDescriptorSet};
use crate::errors::{LaunchsetError, Result};

const INDENT: &str = "    ";

/// Largest integer a JS number holds exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Parse a JS descriptor module into a JSON value.
pub fn parse_value(src: &str) -> Result<Value> {
    let mut p = Parser::new(src);
    p.skip_trivia()?;
    p.skip_directives()?;
    p.skip_export_prefix()?;
    let value = p.parse_value()?;
    p.skip_trivia()?;
    if p.peek() == Some(';') {
        p.bump();
        p.skip_trivia()?;
    }
    if p.peek().is_some() {
        return Err(p.error("unexpected content after the exported object"));
    }
    Ok(value)
}

/// Parse a JS descriptor module into a raw (unvalidated) descriptor set.
pub fn parse(src: &str) -> Result<RawDescriptorSet> {
    let value = parse_value(src)?;
    Ok(serde_json::from_value(value)?)
}

/// Render a descriptor set as a CommonJS module in the hand-written style.
pub fn render(set: &RawDescriptorSet) -> String {
    let mut out = String::from("module.exports = {\n");
    let _ = writeln!(out, "{INDENT}apps: [");
    for app in &set.apps {
        render_app(&mut out, app);
    }
    let _ = writeln!(out, "{INDENT}],");
    out.push_str("};\n");
    out
}

fn render_app(out: &mut String, app: &ProcessSpec) {
    let pad = INDENT.repeat(3);
    let _ = writeln!(out, "{}{{", INDENT.repeat(2));
    let _ = writeln!(out, "{pad}name: {},", quote(&app.name));
    let _ = writeln!(out, "{pad}script: {},", quote(&app.script.to_string_lossy()));
    let _ = writeln!(out, "{pad}instances: {},", app.instances);
    let _ = writeln!(out, "{pad}exec_mode: {},", quote(app.exec_mode.as_str()));
    if let Some(ceiling) = &app.max_memory_restart {
        let _ = writeln!(out, "{pad}max_memory_restart: {},", quote(&ceiling.to_string()));
    }
    let _ = writeln!(out, "{pad}watch: {},", app.watch);
    if app.env.is_empty() {
        let _ = writeln!(out, "{pad}env: {{}},");
    } else {
        let _ = writeln!(out, "{pad}env: {{");
        for (key, value) in &app.env {
            let _ = writeln!(out, "{pad}{INDENT}{}: {},", render_key(key), quote(value));
        }
        let _ = writeln!(out, "{pad}}},");
    }
    let _ = writeln!(out, "{}}},", INDENT.repeat(2));
}

fn render_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_ident_start(c) => chars.all(is_ident_continue),
        _ => false,
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Single-quoted JS string literal.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

struct Parser<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> LaunchsetError {
        LaunchsetError::JsSyntax {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    fn expect(&mut self, want: char) -> Result<()> {
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{want}', found '{c}'"))),
            None => Err(self.error(format!("expected '{want}', found end of input"))),
        }
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    let mut ahead = self.chars.clone();
                    ahead.next();
                    match ahead.next() {
                        Some('/') => {
                            while let Some(c) = self.bump() {
                                if c == '\n' {
                                    break;
                                }
                            }
                        }
                        Some('*') => {
                            self.bump();
                            self.bump();
                            let mut prev = '\0';
                            loop {
                                match self.bump() {
                                    Some('/') if prev == '*' => break,
                                    Some(c) => prev = c,
                                    None => return Err(self.error("unterminated block comment")),
                                }
                            }
                        }
                        _ => return Ok(()),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Skip a directive prologue such as `'use strict';`.
    fn skip_directives(&mut self) -> Result<()> {
        while let Some(q @ ('\'' | '"')) = self.peek() {
            self.parse_string(q)?;
            self.skip_trivia()?;
            if self.peek() == Some(';') {
                self.bump();
            }
            self.skip_trivia()?;
        }
        Ok(())
    }

    /// Accept `module.exports =`, `exports =` or `export default` before the value.
    fn skip_export_prefix(&mut self) -> Result<()> {
        if !self.peek().is_some_and(is_ident_start) {
            return Ok(());
        }
        let word = self.identifier();
        match word.as_str() {
            "module" => {
                self.skip_trivia()?;
                self.expect('.')?;
                self.skip_trivia()?;
                let prop = self.identifier();
                if prop != "exports" {
                    return Err(self.error(format!("expected 'module.exports', found 'module.{prop}'")));
                }
                self.skip_trivia()?;
                self.expect('=')?;
            }
            "exports" => {
                self.skip_trivia()?;
                self.expect('=')?;
            }
            "export" => {
                self.skip_trivia()?;
                let next = self.identifier();
                if next != "default" {
                    return Err(self.error("expected 'export default'"));
                }
            }
            other => {
                return Err(self.error(format!("expected an exported object, found '{other}'")));
            }
        }
        self.skip_trivia()
    }

    fn identifier(&mut self) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if (s.is_empty() && !is_ident_start(c)) || !is_ident_continue(c) {
                break;
            }
            s.push(c);
            self.bump();
        }
        s
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_trivia()?;
        match self.peek() {
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some(q @ ('\'' | '"')) => Ok(Value::String(self.parse_string(q)?)),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.parse_number(),
            Some(c) if is_ident_start(c) => {
                let word = self.identifier();
                match word.as_str() {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "null" => Ok(Value::Null),
                    other => Err(self.error(format!("unsupported expression '{other}'"))),
                }
            }
            Some('`') => Err(self.error("template strings are not supported")),
            Some(c) => Err(self.error(format!("unexpected character '{c}'"))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_object(&mut self) -> Result<Value> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Object(map));
            }

            let key = match self.peek() {
                Some(q @ ('\'' | '"')) => self.parse_string(q)?,
                Some(c) if is_ident_start(c) => self.identifier(),
                Some(c) if c.is_ascii_digit() => self.identifier_digits(),
                Some(c) => return Err(self.error(format!("expected a property name, found '{c}'"))),
                None => return Err(self.error("unterminated object literal")),
            };
            self.skip_trivia()?;
            self.expect(':')?;
            let value = self.parse_value()?;
            if map.insert(key.clone(), value).is_some() {
                return Err(self.error(format!("duplicate key '{key}'")));
            }

            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                Some(c) => return Err(self.error(format!("expected ',' or '}}', found '{c}'"))),
                None => return Err(self.error("unterminated object literal")),
            }
        }
    }

    fn identifier_digits(&mut self) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            s.push(c);
            self.bump();
        }
        s
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(']') {
                self.bump();
                return Ok(Value::Array(items));
            }
            items.push(self.parse_value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                Some(c) => return Err(self.error(format!("expected ',' or ']', found '{c}'"))),
                None => return Err(self.error("unterminated array literal")),
            }
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String> {
        self.bump();
        let mut s = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(s),
                Some('\\') => s.push(self.parse_escape()?),
                Some('\n') | None => return Err(self.error("unterminated string literal")),
                Some(c) => s.push(c),
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char> {
        let c = self
            .bump()
            .ok_or_else(|| self.error("unterminated escape sequence"))?;
        Ok(match c {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '0' => '\0',
            'x' => {
                let code = self.hex_digits(2)?;
                char::from_u32(code).ok_or_else(|| self.error("invalid \\x escape"))?
            }
            'u' => self.parse_unicode_escape()?,
            other => other,
        })
    }

    /// `\uXXXX`, `\u{X..}`, or a UTF-16 surrogate pair written as two
    /// `\uXXXX` escapes. The leading `\u` is already consumed.
    fn parse_unicode_escape(&mut self) -> Result<char> {
        if self.peek() == Some('{') {
            self.bump();
            let mut code = 0u32;
            let mut digits = 0;
            loop {
                match self.bump() {
                    Some('}') if digits > 0 => break,
                    Some(d) if d.is_ascii_hexdigit() && digits < 6 => {
                        code = code * 16 + d.to_digit(16).unwrap_or(0);
                        digits += 1;
                    }
                    _ => return Err(self.error("invalid \\u{...} escape")),
                }
            }
            return char::from_u32(code).ok_or_else(|| self.error("invalid \\u{...} escape"));
        }

        let high = self.hex_digits(4)?;
        if !(0xD800..=0xDBFF).contains(&high) {
            return char::from_u32(high).ok_or_else(|| self.error("lone surrogate in \\u escape"));
        }

        if self.bump() != Some('\\') || self.bump() != Some('u') {
            return Err(self.error("lone surrogate in \\u escape"));
        }
        let low = self.hex_digits(4)?;
        if !(0xDC00..=0xDFFF).contains(&low) {
            return Err(self.error("lone surrogate in \\u escape"));
        }
        let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(code).ok_or_else(|| self.error("invalid \\u escape"))
    }

    fn hex_digits(&mut self, count: usize) -> Result<u32> {
        let mut code = 0u32;
        for _ in 0..count {
            let digit = self
                .bump()
                .and_then(|d| d.to_digit(16))
                .ok_or_else(|| self.error("invalid hex digit in escape"))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }

    fn parse_number(&mut self) -> Result<Value> {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_') {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }

        let cleaned = text.trim_start_matches('+').replace('_', "");
        if let Ok(n) = cleaned.parse::<i64>() {
            return Ok(Value::Number(n.into()));
        }
        if let Ok(n) = cleaned.parse::<u64>() {
            return Ok(Value::Number(n.into()));
        }
        let x = cleaned
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .ok_or_else(|| self.error(format!("invalid number '{text}'")))?;

        // JS has one number type: `1e1` and `10.0` are the integer 10.
        if x.fract() == 0.0 && x.abs() <= MAX_SAFE_INTEGER {
            return Ok(Value::Number((x as i64).into()));
        }
        Number::from_f64(x)
            .map(Value::Number)
            .ok_or_else(|| self.error(format!("invalid number '{text}'")))
    }
}
