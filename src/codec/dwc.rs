//! The DWC base64 dialect (spec §4.1, glossary "DWC encoding").
//!
//! Encoding is standard base64 with `=` padding swapped for `*`. Decoding
//! is lenient: `*` maps back to `=`, and `?`/`.`/`>`/`-` are all accepted
//! as alternate spellings of `/` and `+` (both `.` and `>` mean `+`; both
//! `-` and `?` mean `/`) before standard base64 decoding runs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CodecError;

pub fn dwc_encode(buffer: &[u8]) -> String {
    STANDARD.encode(buffer).replace('=', "*")
}

pub fn dwc_decode(buffer: &str) -> Result<Vec<u8>, CodecError> {
    let normalized: String = buffer
        .chars()
        .map(|c| match c {
            '*' => '=',
            '?' => '/',
            '.' => '+',
            '>' => '+',
            '-' => '/',
            other => other,
        })
        .collect();
    Ok(STANDARD.decode(normalized)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_swaps_padding() {
        assert_eq!(dwc_encode(b"f"), "Zg**");
        assert_eq!(dwc_encode(b"fo"), "Zm8*");
        assert_eq!(dwc_encode(b"foo"), "Zm9v");
    }

    #[test]
    fn decode_accepts_leniencies() {
        // "/" and "+" both appear in this payload's standard encoding;
        // exercise every alternate spelling the decoder accepts.
        let bytes: Vec<u8> = (0u8..=255).collect();
        let standard = base64::engine::general_purpose::STANDARD.encode(&bytes);
        let dwc = standard.replace('=', "*").replace('/', "-").replace('+', ".");
        assert_eq!(dwc_decode(&dwc).unwrap(), bytes);
    }

    #[test]
    fn decode_rejects_malformed_input() {
        assert!(dwc_decode("not valid base64!!!").is_err());
    }

    proptest! {
        #[test]
        fn roundtrip(bytes: Vec<u8>) {
            let encoded = dwc_encode(&bytes);
            let decoded = dwc_decode(&encoded).unwrap();
            prop_assert_eq!(decoded, bytes);
        }
    }
}
