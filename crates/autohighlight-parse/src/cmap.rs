//! ToUnicode CMap parsing.
//!
//! Only the `bfchar` and `bfrange` sections matter for text search; every
//! other CMap operator is skipped.

use std::collections::HashMap;

use crate::error::BackendError;

/// Largest number of codes a single `bfrange` entry may map.
const MAX_RANGE_SPAN: u32 = 0xFFFF;

/// Character code → Unicode string mapping from a `/ToUnicode` stream.
///
/// Destinations may hold several characters (ligatures such as "fi").
#[derive(Debug, Clone, Default)]
pub struct ToUnicodeCMap {
    mappings: HashMap<u32, String>,
}

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Hex(&'a str),
    ArrayStart,
    ArrayEnd,
    Keyword(&'a str),
}

impl ToUnicodeCMap {
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let text = String::from_utf8_lossy(data);
        let tokens = tokenize(&text);
        let mut mappings = HashMap::new();

        let mut i = 0;
        while i < tokens.len() {
            match tokens[i] {
                Token::Keyword("beginbfchar") => {
                    i = parse_bfchar(&tokens, i + 1, &mut mappings)?;
                }
                Token::Keyword("beginbfrange") => {
                    i = parse_bfrange(&tokens, i + 1, &mut mappings)?;
                }
                _ => i += 1,
            }
        }

        Ok(ToUnicodeCMap { mappings })
    }

    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                while i < bytes.len() && bytes[i] != b'\n' && bytes[i] != b'\r' {
                    i += 1;
                }
            }
            b'<' if bytes.get(i + 1) == Some(&b'<') => i += 2,
            b'>' if bytes.get(i + 1) == Some(&b'>') => i += 2,
            b'<' => {
                let start = i + 1;
                let end = text[start..].find('>').map_or(bytes.len(), |e| start + e);
                tokens.push(Token::Hex(&text[start..end]));
                i = end + 1;
            }
            b'[' => {
                tokens.push(Token::ArrayStart);
                i += 1;
            }
            b']' => {
                tokens.push(Token::ArrayEnd);
                i += 1;
            }
            b if b.is_ascii_whitespace() => i += 1,
            _ => {
                let start = i;
                while i < bytes.len()
                    && !bytes[i].is_ascii_whitespace()
                    && !matches!(bytes[i], b'<' | b'>' | b'[' | b']' | b'%')
                {
                    i += 1;
                }
                if i == start {
                    i += 1;
                } else {
                    tokens.push(Token::Keyword(&text[start..i]));
                }
            }
        }
    }

    tokens
}

fn parse_bfchar(
    tokens: &[Token<'_>],
    mut i: usize,
    mappings: &mut HashMap<u32, String>,
) -> Result<usize, BackendError> {
    while i < tokens.len() {
        match (&tokens[i], tokens.get(i + 1)) {
            (Token::Keyword("endbfchar"), _) => return Ok(i + 1),
            (Token::Hex(src), Some(Token::Hex(dst))) => {
                mappings.insert(parse_code(src)?, decode_utf16be(dst)?);
                i += 2;
            }
            _ => i += 1,
        }
    }
    Ok(i)
}

fn parse_bfrange(
    tokens: &[Token<'_>],
    mut i: usize,
    mappings: &mut HashMap<u32, String>,
) -> Result<usize, BackendError> {
    while i < tokens.len() {
        match (&tokens[i], tokens.get(i + 1), tokens.get(i + 2)) {
            (Token::Keyword("endbfrange"), _, _) => return Ok(i + 1),
            (Token::Hex(lo), Some(Token::Hex(hi)), Some(Token::Hex(dst))) => {
                let lo = parse_code(lo)?;
                let hi = parse_code(hi)?.min(lo.saturating_add(MAX_RANGE_SPAN));
                let base = decode_utf16be(dst)?;
                for (offset, code) in (lo..=hi).enumerate() {
                    if let Some(s) = offset_last_char(&base, offset as u32) {
                        mappings.insert(code, s);
                    }
                }
                i += 3;
            }
            (Token::Hex(lo), Some(Token::Hex(hi)), Some(Token::ArrayStart)) => {
                let lo = parse_code(lo)?;
                let hi = parse_code(hi)?;
                i += 3;
                let mut code = Some(lo);
                while let Some(Token::Hex(dst)) = tokens.get(i) {
                    if let Some(c) = code.filter(|c| *c <= hi) {
                        mappings.insert(c, decode_utf16be(dst)?);
                    }
                    code = code.and_then(|c| c.checked_add(1));
                    i += 1;
                }
                if tokens.get(i) == Some(&Token::ArrayEnd) {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    Ok(i)
}

/// Increment the last character of `base` by `offset`, as `bfrange` requires.
fn offset_last_char(base: &str, offset: u32) -> Option<String> {
    let mut chars: Vec<char> = base.chars().collect();
    let last = chars.pop()?;
    let shifted = char::from_u32((last as u32).checked_add(offset)?)?;
    chars.push(shifted);
    Some(chars.into_iter().collect())
}

fn parse_code(hex: &str) -> Result<u32, BackendError> {
    let hex: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    u32::from_str_radix(&hex, 16)
        .map_err(|e| BackendError::Font(format!("invalid CMap code <{hex}>: {e}")))
}

fn decode_utf16be(hex: &str) -> Result<String, BackendError> {
    let hex: Vec<u8> = hex.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    // Single-byte destinations are written as e.g. <41>.
    let padded: Vec<u8> = if hex.len() == 2 {
        [b"00".as_slice(), hex.as_slice()].concat()
    } else {
        hex
    };
    if padded.len() % 4 != 0 {
        return Err(BackendError::Font(format!(
            "UTF-16BE destination has odd length: <{}>",
            String::from_utf8_lossy(&padded)
        )));
    }

    let mut units = Vec::with_capacity(padded.len() / 4);
    for chunk in padded.chunks(4) {
        let s = std::str::from_utf8(chunk)
            .map_err(|e| BackendError::Font(format!("invalid CMap destination: {e}")))?;
        let unit = u16::from_str_radix(s, 16)
            .map_err(|e| BackendError::Font(format!("invalid CMap destination <{s}>: {e}")))?;
        units.push(unit);
    }
    Ok(String::from_utf16_lossy(&units))
}
