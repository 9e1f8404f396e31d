//! Base32 key decoding.
//!
//! RFC 4648 alphabet without padding, case-insensitive, with the usual
//! human-entry aliases: `0` reads as `O`, `1` as `L`, `8` as `B`.
//! Trailing bits short of a full byte are discarded.

use crate::core::Secret;

use super::{SecretCodec, SecretDecodeError};

/// RFC 4648 base32 decoder for hand-typed authenticator keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base32;

impl Base32 {
    /// Map one input character to its 5-bit value.
    fn value_of(ch: char) -> Option<u8> {
        let upper = ch.to_ascii_uppercase();
        let aliased = match upper {
            '0' => 'O',
            '1' => 'L',
            '8' => 'B',
            other => other,
        };
        match aliased {
            'A'..='Z' => Some(aliased as u8 - b'A'),
            '2'..='7' => Some(aliased as u8 - b'2' + 26),
            _ => None,
        }
    }
}

impl SecretCodec for Base32 {
    fn decode(&self, input: &str) -> Result<Secret, SecretDecodeError> {
        let mut buffer: u16 = 0;
        let mut bits_left: u8 = 0;
        let mut bytes = Vec::with_capacity(input.len() * 5 / 8);

        for ch in input.chars() {
            let value = Self::value_of(ch).ok_or(SecretDecodeError::InvalidCharacter(ch))?;
            buffer = (buffer << 5) | u16::from(value);
            bits_left += 5;
            if bits_left >= 8 {
                bits_left -= 8;
                bytes.push((buffer >> bits_left) as u8);
            }
        }

        if bytes.is_empty() {
            return Err(SecretDecodeError::Empty);
        }
        Ok(Secret::new(bytes))
    }
}
