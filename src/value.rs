use crate::statics;
use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt::{self, Write as _};

// Strict JSON has no spelling for non-finite floats. Before parsing they are
// swapped for number literals that are recognized again on conversion.
// `1e999999999` overflows to infinity on its own.
const NAN_LITERAL: &str = "0.0e-999999999";
const INF_LITERAL: &str = "1e999999999";
const NEG_INF_LITERAL: &str = "-1e999999999";

/// Represents a number that keeps the integer vs float distinction for round-tripping.
/// `3` and `3.0` are different values in a CIT file and must be written back as read.
#[derive(Debug, Clone, PartialEq)]
pub enum CitNumber {
    I64(i64),
    U64(u64),
    F64(f64),
    /// An integer outside the 64-bit range, kept as written.
    Big(String),
}

/// One step from a container to one of its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a node inside a document, as the chain of keys/indices from the root.
/// The empty path is the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ValuePath(Vec<PathSegment>);

impl ValuePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    pub fn child_key(&self, key: &str) -> Self {
        let mut out = self.clone();
        out.push(PathSegment::Key(key.to_string()));
        out
    }

    pub fn child_index(&self, idx: usize) -> Self {
        let mut out = self.clone();
        out.push(PathSegment::Index(idx));
        out
    }
}

impl fmt::Display for ValuePath {
    /// JSON-pointer style, e.g. `/districts/0/blocks/3`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for seg in &self.0 {
            match seg {
                PathSegment::Key(k) => write!(f, "/{k}")?,
                PathSegment::Index(i) => write!(f, "/{i}")?,
            }
        }
        Ok(())
    }
}

/// A node of a parsed CIT document.
/// Objects keep their key order so an unedited file is written back with the same layout.
#[derive(Debug, Clone, PartialEq)]
pub enum CitValue {
    Null,
    Bool(bool),
    Number(CitNumber),
    String(String),
    Array(Vec<CitValue>),
    Object(IndexMap<String, CitValue>),
}

impl CitValue {
    pub fn as_object(&self) -> Option<&IndexMap<String, CitValue>> {
        match self {
            CitValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, CitValue>> {
        match self {
            CitValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[CitValue]> {
        match self {
            CitValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CitValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&CitValue> {
        self.as_object().and_then(|m| m.get(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut CitValue> {
        self.as_object_mut().and_then(|m| m.get_mut(key))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            CitValue::Null => "null",
            CitValue::Bool(_) => "bool",
            CitValue::Number(_) => "number",
            CitValue::String(_) => "string",
            CitValue::Array(_) => "array",
            CitValue::Object(_) => "object",
        }
    }

    pub fn pointer(&self, path: &ValuePath) -> Option<&CitValue> {
        path.segments()
            .iter()
            .try_fold(self, |node, seg| match (seg, node) {
                (PathSegment::Key(k), CitValue::Object(map)) => map.get(k),
                (PathSegment::Index(i), CitValue::Array(values)) => values.get(*i),
                _ => None,
            })
    }

    pub fn pointer_mut(&mut self, path: &ValuePath) -> Option<&mut CitValue> {
        let mut node = self;
        for seg in path.segments() {
            node = match (seg, node) {
                (PathSegment::Key(k), CitValue::Object(map)) => map.get_mut(k)?,
                (PathSegment::Index(i), CitValue::Array(values)) => values.get_mut(*i)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Parse CIT text. Only strict JSON is accepted, plus the `NaN`/`Infinity`/`-Infinity`
    /// literals the game's serializer can emit.
    pub fn parse(text: &str) -> anyhow::Result<CitValue> {
        let prepared = replace_non_finite(text);
        let json: serde_json::Value = serde_json::from_str(&prepared)?;
        Self::from_json(json)
    }

    fn from_json(json: serde_json::Value) -> anyhow::Result<CitValue> {
        Ok(match json {
            serde_json::Value::Null => CitValue::Null,
            serde_json::Value::Bool(v) => CitValue::Bool(v),
            serde_json::Value::Number(n) => {
                CitValue::Number(CitNumber::from_literal(&n.to_string())?)
            }
            serde_json::Value::String(s) => CitValue::String(s),
            serde_json::Value::Array(values) => CitValue::Array(
                values
                    .into_iter()
                    .map(Self::from_json)
                    .collect::<anyhow::Result<_>>()?,
            ),
            serde_json::Value::Object(map) => CitValue::Object(
                map.into_iter()
                    .map(|(k, v)| Self::from_json(v).map(|v| (k, v)))
                    .collect::<anyhow::Result<_>>()?,
            ),
        })
    }

    /// Serialize in the layout CIT files are written with:
    /// - 2-space indentation, `": "` after keys
    /// - non-ASCII escaped as lowercase `\uXXXX`
    /// - empty containers inline (`{}` / `[]`)
    /// - no trailing newline
    pub fn to_cit_pretty(&self) -> String {
        self.to_cit_pretty_with_newline(statics::NL_LF)
    }

    pub fn to_cit_pretty_with_newline(&self, newline: &str) -> String {
        let mut out = String::new();
        self.write_cit(&mut out, 0, newline);
        out
    }

    fn write_cit(&self, out: &mut String, indent: usize, newline: &str) {
        match self {
            CitValue::Null => out.push_str("null"),
            CitValue::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            CitValue::Number(n) => n.write_cit(out),
            CitValue::String(s) => write_escaped_string_ascii(out, s),
            CitValue::Array(values) => {
                if values.is_empty() {
                    out.push_str("[]");
                    return;
                }
                out.push('[');
                out.push_str(newline);
                for (i, v) in values.iter().enumerate() {
                    push_indent(out, indent + 1);
                    v.write_cit(out, indent + 1, newline);
                    if i + 1 != values.len() {
                        out.push(',');
                    }
                    out.push_str(newline);
                }
                push_indent(out, indent);
                out.push(']');
            }
            CitValue::Object(map) => {
                if map.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push('{');
                out.push_str(newline);
                for (i, (k, v)) in map.iter().enumerate() {
                    push_indent(out, indent + 1);
                    write_escaped_string_ascii(out, k);
                    out.push_str(": ");
                    v.write_cit(out, indent + 1, newline);
                    if i + 1 != map.len() {
                        out.push(',');
                    }
                    out.push_str(newline);
                }
                push_indent(out, indent);
                out.push('}');
            }
        }
    }
}

fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str(statics::CIT_INDENT);
    }
}

impl CitNumber {
    /// Classify a JSON number literal as written in the source text.
    fn from_literal(text: &str) -> anyhow::Result<CitNumber> {
        if text == NAN_LITERAL {
            return Ok(CitNumber::F64(f64::NAN));
        }
        if text.contains(['.', 'e', 'E']) {
            // Out-of-range exponents become +-infinity, as the game's reader does.
            return Ok(CitNumber::F64(text.parse()?));
        }
        if let Ok(v) = text.parse::<i64>() {
            return Ok(CitNumber::I64(v));
        }
        if let Ok(v) = text.parse::<u64>() {
            return Ok(CitNumber::U64(v));
        }
        Ok(CitNumber::Big(text.to_string()))
    }

    fn write_cit(&self, out: &mut String) {
        match self {
            CitNumber::I64(v) => out.push_str(&v.to_string()),
            CitNumber::U64(v) => out.push_str(&v.to_string()),
            CitNumber::F64(v) => write_float(out, *v),
            CitNumber::Big(digits) => out.push_str(digits),
        }
    }
}

/// Swap bare `NaN`/`Infinity`/`-Infinity` tokens outside strings for the
/// placeholder literals. A number already spelled like the NaN placeholder is
/// rewritten to its value (zero) so it cannot be mistaken for one.
fn replace_non_finite(text: &str) -> Cow<'_, str> {
    if !text.contains("NaN") && !text.contains("Infinity") && !text.contains(NAN_LITERAL) {
        return Cow::Borrowed(text);
    }

    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if in_string {
            match b {
                b'\\' => i += 2,
                b'"' => {
                    in_string = false;
                    i += 1;
                }
                _ => i += 1,
            }
            continue;
        }

        let rest = &bytes[i..];
        let (len, literal) = if rest.starts_with(b"-Infinity") {
            ("-Infinity".len(), Some(NEG_INF_LITERAL))
        } else if rest.starts_with(b"Infinity") {
            ("Infinity".len(), Some(INF_LITERAL))
        } else if rest.starts_with(b"NaN") {
            ("NaN".len(), Some(NAN_LITERAL))
        } else if b == b'-' || b.is_ascii_digit() {
            let len = rest
                .iter()
                .take_while(|&&c| c.is_ascii_digit() || matches!(c, b'-' | b'+' | b'.' | b'e' | b'E'))
                .count();
            let collides = &rest[..len] == NAN_LITERAL.as_bytes();
            (len, collides.then_some("0.0"))
        } else {
            if b == b'"' {
                in_string = true;
            }
            (1, None)
        };

        if let Some(literal) = literal {
            out.push_str(&text[copied..i]);
            out.push_str(literal);
            copied = i + len;
        }
        i += len;
    }

    out.push_str(&text[copied..]);
    Cow::Owned(out)
}

/// Shortest round-trip float text. Decimal notation for exponents in [-4, 16),
/// otherwise `1.5e-05` / `1e+16` with a signed, at-least-two-digit exponent.
fn write_float(out: &mut String, v: f64) {
    if v.is_nan() {
        out.push_str("NaN");
        return;
    }
    if v.is_infinite() {
        out.push_str(if v.is_sign_negative() { "-Infinity" } else { "Infinity" });
        return;
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. "-1.25e-7".
    let sci = format!("{v:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        out.push_str(&sci);
        return;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        out.push_str(&sci);
        return;
    };

    if !(-4..16).contains(&exp) {
        out.push_str(mantissa);
        out.push('e');
        out.push(if exp < 0 { '-' } else { '+' });
        write!(out, "{:02}", exp.unsigned_abs()).ok();
        return;
    }

    let (negative, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    if negative {
        out.push('-');
    }

    if exp < 0 {
        out.push_str("0.");
        for _ in 0..(-exp - 1) {
            out.push('0');
        }
        out.push_str(&digits);
        return;
    }

    let int_len = exp as usize + 1;
    if digits.len() <= int_len {
        out.push_str(&digits);
        for _ in digits.len()..int_len {
            out.push('0');
        }
        out.push_str(".0");
    } else {
        out.push_str(&digits[..int_len]);
        out.push('.');
        out.push_str(&digits[int_len..]);
    }
}

fn write_escaped_string_ascii(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if (' '..='~').contains(&c) => out.push(c),
            c => {
                let cp = c as u32;
                if cp <= 0xFFFF {
                    write!(out, "\\u{:04x}", cp).ok();
                } else {
                    // Encode as UTF-16 surrogate pair.
                    let u = cp - 0x1_0000;
                    let high = 0xD800 + ((u >> 10) & 0x3FF);
                    let low = 0xDC00 + (u & 0x3FF);
                    write!(out, "\\u{:04x}\\u{:04x}", high, low).ok();
                }
            }
        }
    }
    out.push('"');
}
