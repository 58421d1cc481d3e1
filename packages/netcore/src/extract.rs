//! Pull a single string member out of a JSON object body.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::de::{self, DeserializeSeed, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_json_core::de::{Deserializer, Error as JsonError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Array,
    Object,
    /// Numbers, booleans and `null`.
    Literal,
}

impl FieldKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
            Self::Literal => "literal",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedField(String);

impl ExtractedField {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ExtractedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractError {
    Parse(JsonError),
    Missing,
    TypeMismatch(FieldKind),
    OutOfMemory,
}

impl ExtractError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parse(_) => "parse",
            Self::Missing => "missing",
            Self::TypeMismatch(_) => "type_mismatch",
            Self::OutOfMemory => "out_of_memory",
        }
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "parse: {}", err),
            Self::TypeMismatch(kind) => write!(f, "type_mismatch: {}", kind.as_str()),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Parses `body` as a JSON object and returns the first member called `name`
/// as an owned string. Escape sequences in keys and values are resolved.
///
/// Any syntax error in the body, including in members other than `name`, is
/// reported as [`ExtractError::Parse`].
pub fn extract_string_field(body: &[u8], name: &str) -> Result<ExtractedField, ExtractError> {
    let mut scratch = Vec::new();
    scratch
        .try_reserve_exact(body.len())
        .map_err(|_| ExtractError::OutOfMemory)?;
    scratch.resize(body.len(), 0u8);

    let mut de = Deserializer::new(body, Some(&mut scratch));
    let found = FieldLookup { name }
        .deserialize(&mut de)
        .map_err(ExtractError::Parse)?;
    de.end().map_err(ExtractError::Parse)?;
    check_scalars(body).map_err(ExtractError::Parse)?;

    match found {
        None => Err(ExtractError::Missing),
        Some(FieldValue::String(value)) => Ok(ExtractedField(value)),
        Some(FieldValue::Unstorable) => Err(ExtractError::OutOfMemory),
        Some(FieldValue::Other(kind)) => Err(ExtractError::TypeMismatch(kind)),
    }
}

enum FieldValue {
    String(String),
    Unstorable,
    Other(FieldKind),
}

struct FieldLookup<'n> {
    name: &'n str,
}

impl<'de, 'n> DeserializeSeed<'de> for FieldLookup<'n> {
    type Value = Option<FieldValue>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de, 'n> Visitor<'de> for FieldLookup<'n> {
    type Value = Option<FieldValue>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut found = None;
        while let Some(matches) = map.next_key_seed(KeyMatches(self.name))? {
            if matches && found.is_none() {
                found = Some(map.next_value_seed(FieldValueSeed)?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(found)
    }
}

/// Compares an object key against the wanted name without keeping it.
struct KeyMatches<'n>(&'n str);

impl<'de, 'n> DeserializeSeed<'de> for KeyMatches<'n> {
    type Value = bool;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }
}

impl<'de, 'n> Visitor<'de> for KeyMatches<'n> {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object key")
    }

    fn visit_str<E>(self, key: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(key == self.0)
    }
}

struct FieldValueSeed;

impl<'de> DeserializeSeed<'de> for FieldValueSeed {
    type Value = FieldValue;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_ignored_any(self)
    }
}

impl<'de> Visitor<'de> for FieldValueSeed {
    type Value = FieldValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        let mut owned = String::new();
        if owned.try_reserve_exact(value.len()).is_err() {
            return Ok(FieldValue::Unstorable);
        }
        owned.push_str(value);
        Ok(FieldValue::String(owned))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(FieldValue::Other(FieldKind::Literal))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(FieldValue::Other(FieldKind::Array))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(FieldValue::Other(FieldKind::Object))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Comma,
    Colon,
    String,
    Scalar,
}

/// serde-json-core skips numbers and literals by scanning to the next `,` `}`
/// or `]` without reading them. After a successful parse this rejects what
/// that scan lets through: a malformed literal or number, a scalar followed by
/// anything but a delimiter, and a colon that does not follow a key.
fn check_scalars(body: &[u8]) -> Result<(), JsonError> {
    let mut prev = None;
    let mut pos = 0;
    while let Some(&byte) = body.get(pos) {
        let token = match byte {
            b' ' | b'\t' | b'\n' | b'\r' => {
                pos += 1;
                continue;
            }
            b'{' | b'[' => Token::Open,
            b'}' | b']' => Token::Close,
            b',' => Token::Comma,
            b':' if prev == Some(Token::String) => Token::Colon,
            b':' => return Err(JsonError::ExpectedSomeValue),
            b'"' => {
                pos = string_end(body, pos + 1)?;
                Token::String
            }
            _ => {
                let end = scalar_end(body, pos);
                check_scalar(&body[pos..end])?;
                pos = end;
                Token::Scalar
            }
        };
        if !matches!(token, Token::String | Token::Scalar) {
            pos += 1;
        }
        if prev == Some(Token::Scalar) && !matches!(token, Token::Close | Token::Comma) {
            return Err(JsonError::ExpectedObjectCommaOrEnd);
        }
        prev = Some(token);
    }
    Ok(())
}

/// Index just past the closing quote of a string whose body starts at `pos`.
fn string_end(body: &[u8], mut pos: usize) -> Result<usize, JsonError> {
    while let Some(&byte) = body.get(pos) {
        match byte {
            b'\\' => pos += 2,
            b'"' => return Ok(pos + 1),
            _ => pos += 1,
        }
    }
    Err(JsonError::EofWhileParsingString)
}

fn scalar_end(body: &[u8], pos: usize) -> usize {
    body[pos..]
        .iter()
        .position(|byte| {
            matches!(
                byte,
                b' ' | b'\t' | b'\n' | b'\r' | b'{' | b'}' | b'[' | b']' | b',' | b':' | b'"'
            )
        })
        .map_or(body.len(), |len| pos + len)
}

fn check_scalar(token: &[u8]) -> Result<(), JsonError> {
    match token {
        b"true" | b"false" | b"null" => Ok(()),
        [b't' | b'f' | b'n', ..] => Err(JsonError::ExpectedSomeIdent),
        _ if is_number(token) => Ok(()),
        _ => Err(JsonError::InvalidNumber),
    }
}

/// `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`
fn is_number(token: &[u8]) -> bool {
    let digits = |rest: &[u8]| rest.iter().take_while(|b| b.is_ascii_digit()).count();

    let mut rest = token.strip_prefix(b"-").unwrap_or(token);
    match rest.first() {
        Some(b'0') => rest = &rest[1..],
        Some(b'1'..=b'9') => rest = &rest[digits(rest)..],
        _ => return false,
    }
    if let Some(fraction) = rest.strip_prefix(b".") {
        let len = digits(fraction);
        if len == 0 {
            return false;
        }
        rest = &fraction[len..];
    }
    if let [b'e' | b'E', exponent @ ..] = rest {
        let exponent = match exponent {
            [b'+' | b'-', tail @ ..] => tail,
            _ => exponent,
        };
        let len = digits(exponent);
        if len == 0 {
            return false;
        }
        rest = &exponent[len..];
    }
    rest.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_string_value() {
        let field = extract_string_field(br#"{"binaryURL":"https://x/y"}"#, "binaryURL").unwrap();
        assert_eq!(field.as_str(), "https://x/y");
    }

    #[test]
    fn missing_field() {
        assert_eq!(
            extract_string_field(br#"{"other":"x"}"#, "binaryURL"),
            Err(ExtractError::Missing)
        );
        assert_eq!(
            extract_string_field(b"{}", "binaryURL"),
            Err(ExtractError::Missing)
        );
    }

    #[test]
    fn numeric_value_is_type_mismatch() {
        assert_eq!(
            extract_string_field(br#"{"binaryURL":123}"#, "binaryURL"),
            Err(ExtractError::TypeMismatch(FieldKind::Literal))
        );
    }

    #[test]
    fn null_and_containers_are_type_mismatches() {
        assert_eq!(
            extract_string_field(br#"{"binaryURL":null}"#, "binaryURL"),
            Err(ExtractError::TypeMismatch(FieldKind::Literal))
        );
        assert_eq!(
            extract_string_field(br#"{"binaryURL":["a","b"]}"#, "binaryURL"),
            Err(ExtractError::TypeMismatch(FieldKind::Array))
        );
        assert_eq!(
            extract_string_field(br#"{"binaryURL":{"href":"a"}}"#, "binaryURL"),
            Err(ExtractError::TypeMismatch(FieldKind::Object))
        );
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            extract_string_field(b"{not json", "binaryURL"),
            Err(ExtractError::Parse(_))
        ));
        assert!(matches!(
            extract_string_field(br#"{"binaryURL":"https://x/y""#, "binaryURL"),
            Err(ExtractError::Parse(_))
        ));
        assert!(matches!(
            extract_string_field(b"", "binaryURL"),
            Err(ExtractError::Parse(_))
        ));
    }

    #[test]
    fn top_level_must_be_object() {
        assert!(matches!(
            extract_string_field(br#"["binaryURL"]"#, "binaryURL"),
            Err(ExtractError::Parse(_))
        ));
        assert!(matches!(
            extract_string_field(br#""binaryURL""#, "binaryURL"),
            Err(ExtractError::Parse(_))
        ));
    }

    #[test]
    fn trailing_garbage_is_parse_error() {
        assert!(matches!(
            extract_string_field(br#"{"binaryURL":"a"} x"#, "binaryURL"),
            Err(ExtractError::Parse(JsonError::TrailingCharacters))
        ));
    }

    #[test]
    fn malformed_sibling_scalar_is_parse_error() {
        assert_eq!(
            extract_string_field(br#"{"binaryURL":"https://x/y","size":12abc}"#, "binaryURL"),
            Err(ExtractError::Parse(JsonError::InvalidNumber))
        );
        assert!(matches!(
            extract_string_field(br#"{"binaryURL":"https://x/y","sizes":[1, 2 3]}"#, "binaryURL"),
            Err(ExtractError::Parse(_))
        ));
        assert!(matches!(
            extract_string_field(br#"{"binaryURL":"https://x/y","n"::1}"#, "binaryURL"),
            Err(ExtractError::Parse(_))
        ));
        assert!(matches!(
            extract_string_field(br#"{"binaryURL":"https://x/y","n":1 "m"}"#, "binaryURL"),
            Err(ExtractError::Parse(_))
        ));
    }

    #[test]
    fn malformed_literal_value_is_parse_error() {
        assert_eq!(
            extract_string_field(br#"{"binaryURL":nonsense}"#, "binaryURL"),
            Err(ExtractError::Parse(JsonError::ExpectedSomeIdent))
        );
        assert_eq!(
            extract_string_field(br#"{"binaryURL":tru}"#, "binaryURL"),
            Err(ExtractError::Parse(JsonError::ExpectedSomeIdent))
        );
        assert_eq!(
            extract_string_field(br#"{"binaryURL":-}"#, "binaryURL"),
            Err(ExtractError::Parse(JsonError::InvalidNumber))
        );
    }

    #[test]
    fn well_formed_numbers_are_accepted() {
        let body = br#"{"a":0,"b":-12,"c":3.25,"d":1e9,"e":-0.5E-3,"f":[7,false,null],"binaryURL":"u"}"#;
        assert_eq!(extract_string_field(body, "binaryURL").unwrap().as_str(), "u");
        for bad in ["01", "1.", ".5", "1e", "+1", "0x10"] {
            assert!(!is_number(bad.as_bytes()), "{bad}");
        }
    }

    #[test]
    fn delimiters_inside_strings_are_not_tokens() {
        let body = br#"{"note":"a: b, [c] {d} \"e\"","binaryURL":"https://x/y?q=1,2"}"#;
        assert_eq!(
            extract_string_field(body, "binaryURL").unwrap().as_str(),
            "https://x/y?q=1,2"
        );
    }

    #[test]
    fn skips_nested_siblings() {
        let body = br#"{
            "version": "1.4.2",
            "meta": {"build": 88, "tags": ["stable", "lts"], "signed": true},
            "sizes": [1, 2, {"x": null}],
            "binaryURL": "https://cdn.example.com/fw.bin",
            "sha256": "ab12"
        }"#;
        let field = extract_string_field(body, "binaryURL").unwrap();
        assert_eq!(field.to_string(), "https://cdn.example.com/fw.bin");
    }

    #[test]
    fn nested_field_with_same_name_is_not_matched() {
        let body = br#"{"meta":{"binaryURL":"https://wrong"},"other":1}"#;
        assert_eq!(
            extract_string_field(body, "binaryURL"),
            Err(ExtractError::Missing)
        );
    }

    #[test]
    fn escape_sequences_are_resolved() {
        let body = br#"{"binaryURL":"https:\/\/x\/y?a=\"b\""}"#;
        let field = extract_string_field(body, "binaryURL").unwrap();
        assert_eq!(field.as_str(), r#"https://x/y?a="b""#);
    }

    #[test]
    fn first_duplicate_member_wins() {
        let body = br#"{"binaryURL":"https://first","binaryURL":"https://second"}"#;
        let field = extract_string_field(body, "binaryURL").unwrap();
        assert_eq!(field.into_inner(), "https://first");
    }

    #[test]
    fn duplicate_after_mismatch_does_not_override() {
        let body = br#"{"binaryURL":7,"binaryURL":"https://second"}"#;
        assert_eq!(
            extract_string_field(body, "binaryURL"),
            Err(ExtractError::TypeMismatch(FieldKind::Literal))
        );
    }
}
