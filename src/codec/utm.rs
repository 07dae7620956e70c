//! UTM opaque-message envelope (spec §4.1).
//!
//! `0 6 <B|S> <S|A> <type> _ <empty> <payload>` — 8 space-separated
//! tokens. Parse failures are always non-fatal to the sender; callers log
//! and move on (spec §4.1, §7).

use crate::codec::dwc::dwc_decode;
use crate::error::UtmError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtmBody {
    Binary(Vec<u8>),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtmMessage {
    pub message_type: i64,
    pub body: UtmBody,
}

impl UtmMessage {
    pub fn parse(payload: &str) -> Result<Self, UtmError> {
        let tokens: Vec<&str> = payload.split(' ').collect();
        if tokens.len() != 8 {
            return Err(UtmError::WrongTokenCount(tokens.len()));
        }

        expect_token("tok[0]", tokens[0], "0")?;
        expect_token("tok[1]", tokens[1], "6")?;
        if tokens[3] != "S" && tokens[3] != "A" {
            return Err(UtmError::BadConstant {
                field: "tok[3]",
                expected: "S|A",
                actual: tokens[3].to_string(),
            });
        }
        let message_type: i64 = tokens[4].parse()?;
        expect_token("tok[5]", tokens[5], "_")?;
        if !tokens[6].is_empty() {
            return Err(UtmError::BadConstant {
                field: "tok[6]",
                expected: "",
                actual: tokens[6].to_string(),
            });
        }

        let body = match tokens[2] {
            "B" => UtmBody::Binary(dwc_decode(tokens[7])?),
            "S" => UtmBody::Text(tokens[7].to_string()),
            other => return Err(UtmError::UnknownEncoding(other.to_string())),
        };

        Ok(Self { message_type, body })
    }
}

fn expect_token(field: &'static str, actual: &str, expected: &'static str) -> Result<(), UtmError> {
    if actual == expected {
        Ok(())
    } else {
        Err(UtmError::BadConstant {
            field,
            expected,
            actual: actual.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_binary_payload() {
        let encoded = crate::codec::dwc::dwc_encode(b"hi");
        let line = format!("0 6 B S 3 _  {encoded}");
        let msg = UtmMessage::parse(&line).unwrap();
        assert_eq!(msg.message_type, 3);
        assert_eq!(msg.body, UtmBody::Binary(b"hi".to_vec()));
    }

    #[test]
    fn parses_text_payload() {
        let line = "0 6 S A 7 _  hello";
        let msg = UtmMessage::parse(line).unwrap();
        assert_eq!(msg.message_type, 7);
        assert_eq!(msg.body, UtmBody::Text("hello".to_string()));
    }

    #[test]
    fn rejects_wrong_token_count() {
        assert!(matches!(
            UtmMessage::parse("0 6 B S 1 _"),
            Err(UtmError::WrongTokenCount(6))
        ));
    }

    #[test]
    fn rejects_unknown_encoding() {
        assert!(matches!(
            UtmMessage::parse("0 6 X A 1 _  payload"),
            Err(UtmError::UnknownEncoding(_))
        ));
    }
}
