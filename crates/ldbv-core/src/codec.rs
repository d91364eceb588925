//! Conversions between raw store bytes and the text shown to the operator.

use std::fmt;
use std::str::FromStr;

/// How keys are rendered in the list and how search input is decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyFormat {
    Text,
    #[default]
    Hex,
}

/// How the selected value is rendered. Every variant is one-way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueFormat {
    Text,
    #[default]
    Hex,
    Decimal,
    Binary,
}

/// A format name that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown format `{0}`")]
pub struct UnknownFormat(pub String);

impl KeyFormat {
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Hex => "hex",
        }
    }
}

impl ValueFormat {
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Hex => "hex",
            Self::Decimal => "number",
            Self::Binary => "binary",
        }
    }
}

impl FromStr for KeyFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "text" | "string" => Ok(Self::Text),
            "hex" => Ok(Self::Hex),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

impl FromStr for ValueFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "text" | "string" => Ok(Self::Text),
            "hex" => Ok(Self::Hex),
            "number" | "decimal" | "num" => Ok(Self::Decimal),
            "binary" | "bin" => Ok(Self::Binary),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for KeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn encode_key(raw: &[u8], format: KeyFormat) -> String {
    match format {
        KeyFormat::Text => String::from_utf8_lossy(raw).into_owned(),
        KeyFormat::Hex => hex::encode(raw),
    }
}

/// Turns operator input back into raw key bytes.
///
/// Hex input may carry a `0x` prefix. Input that is not valid hex is used
/// as literal bytes so a search always goes somewhere.
pub fn decode_key(text: &str, format: KeyFormat) -> Vec<u8> {
    match format {
        KeyFormat::Text => text.as_bytes().to_vec(),
        KeyFormat::Hex => {
            let trimmed = text.trim();
            let digits = match trimmed
                .strip_prefix("0x")
                .or_else(|| trimmed.strip_prefix("0X"))
            {
                // A bare `0x` names no bytes, so it is not hex.
                Some("") => return text.as_bytes().to_vec(),
                Some(digits) => digits,
                None => trimmed,
            };
            hex::decode(digits).unwrap_or_else(|_| text.as_bytes().to_vec())
        }
    }
}

pub fn encode_value(raw: &[u8], format: ValueFormat) -> String {
    match format {
        ValueFormat::Text => String::from_utf8_lossy(raw).into_owned(),
        ValueFormat::Hex => hex::encode(raw),
        ValueFormat::Decimal => bracketed(raw, |byte| byte.to_string()),
        ValueFormat::Binary => bracketed(raw, |byte| format!("{byte:b}")),
    }
}

fn bracketed(raw: &[u8], render: impl Fn(u8) -> String) -> String {
    let body = raw
        .iter()
        .map(|byte| render(*byte))
        .collect::<Vec<_>>()
        .join(" ");
    format!("[{body}]")
}

#[cfg(test)]
mod tests {
    use super::{KeyFormat, UnknownFormat, ValueFormat, decode_key, encode_key, encode_value};

    #[test]
    fn key_formats_render_labels() {
        assert_eq!(encode_key(b"12", KeyFormat::Text), "12");
        assert_eq!(encode_key(b"12", KeyFormat::Hex), "3132");
        assert_eq!(encode_key(&[0xff, 0x00], KeyFormat::Hex), "ff00");
        assert_eq!(encode_key(&[0x61, 0xff], KeyFormat::Text), "a\u{fffd}");
    }

    #[test]
    fn hex_decode_accepts_prefix_and_falls_back_to_literal() {
        assert_eq!(decode_key("3132", KeyFormat::Hex), b"12".to_vec());
        assert_eq!(decode_key(" 0x3132 ", KeyFormat::Hex), b"12".to_vec());
        assert_eq!(decode_key("0XfF", KeyFormat::Hex), vec![0xff]);
        assert_eq!(decode_key("abc", KeyFormat::Hex), b"abc".to_vec());
        assert_eq!(decode_key("zz", KeyFormat::Hex), b"zz".to_vec());
        assert_eq!(decode_key("", KeyFormat::Hex), Vec::<u8>::new());
    }

    #[test]
    fn bare_hex_prefix_is_a_literal_search() {
        assert_eq!(decode_key("0x", KeyFormat::Hex), b"0x".to_vec());
        assert_eq!(decode_key("0X", KeyFormat::Hex), b"0X".to_vec());
        assert_eq!(decode_key(" 0x ", KeyFormat::Hex), b" 0x ".to_vec());
        assert_eq!(decode_key("0x00", KeyFormat::Hex), vec![0x00]);
        assert_eq!(decode_key("abc", KeyFormat::Text), b"abc".to_vec());
    }

    #[test]
    fn value_formats_match_per_byte_rendering() {
        assert_eq!(encode_value(b"01", ValueFormat::Text), "01");
        assert_eq!(encode_value(b"01", ValueFormat::Hex), "3031");
        assert_eq!(encode_value(b"01", ValueFormat::Decimal), "[48 49]");
        assert_eq!(encode_value(b"01", ValueFormat::Binary), "[110000 110001]");
        assert_eq!(encode_value(b"", ValueFormat::Decimal), "[]");
    }

    #[test]
    fn format_names_parse_with_aliases() {
        assert_eq!("string".parse::<KeyFormat>(), Ok(KeyFormat::Text));
        assert_eq!(" hex ".parse::<KeyFormat>(), Ok(KeyFormat::Hex));
        assert_eq!(
            "number".parse::<KeyFormat>(),
            Err(UnknownFormat("number".into()))
        );
        assert_eq!("number".parse::<ValueFormat>(), Ok(ValueFormat::Decimal));
        assert_eq!("binary".parse::<ValueFormat>(), Ok(ValueFormat::Binary));
        assert!("octal".parse::<ValueFormat>().is_err());
        assert_eq!(ValueFormat::Decimal.to_string(), "number");
    }
}
