//! Device message dictionary and record codecs.
//!
//! A [`DeviceMessage`] is the outbound unit of work: an ordered set of
//! keyed fields matching the firmware's dictionary layout. Each
//! [`Operation`] variant has exactly one serialization; the read path
//! decodes the packed token records the device reports back.

use std::fmt;

use thiserror::Error;

use crate::core::constants::{
    KEY_CLEAR_TOKENS, KEY_CREATE_TOKEN, KEY_CREATE_TOKEN_ID, KEY_CREATE_TOKEN_NAME,
    KEY_DELETE_TOKEN, KEY_READ_TOKEN_LIST, KEY_READ_TOKEN_LIST_RESULT, KEY_SET_TOKEN_LIST_ORDER,
    KEY_SET_UTC_OFFSET, KEY_UPDATE_TOKEN, MAX_NAME_LENGTH, RECORD_NAME_OFFSET,
};
use crate::core::{Token, TokenId};
use crate::sync::Operation;

/// Errors decoding inbound device messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// Record is shorter than the fixed name offset.
    #[error("unexpected end of record")]
    UnexpectedEof,

    /// Record id does not fit the assignable id range.
    #[error("record id {0} out of range")]
    IdOutOfRange(u16),

    /// Name bytes are not valid UTF-8.
    #[error("record name is not valid UTF-8")]
    InvalidName,
}

/// Dictionary key of one message field, fixed by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MessageKey {
    /// UTC offset announcement.
    SetUtcOffset = KEY_SET_UTC_OFFSET,
    /// Creation secret bytes.
    CreateToken = KEY_CREATE_TOKEN,
    /// Creation id.
    CreateTokenId = KEY_CREATE_TOKEN_ID,
    /// Creation display name.
    CreateTokenName = KEY_CREATE_TOKEN_NAME,
    /// Deletion id.
    DeleteToken = KEY_DELETE_TOKEN,
    /// Wipe the on-device list.
    ClearTokens = KEY_CLEAR_TOKENS,
    /// Token list read request.
    ReadTokenList = KEY_READ_TOKEN_LIST,
    /// One reported token record.
    ReadTokenListResult = KEY_READ_TOKEN_LIST_RESULT,
    /// Packed rename record.
    UpdateToken = KEY_UPDATE_TOKEN,
    /// Post-sync ordering, one byte per id.
    SetTokenListOrder = KEY_SET_TOKEN_LIST_ORDER,
}

impl MessageKey {
    /// The numeric dictionary key.
    pub fn value(self) -> u32 {
        self as u32
    }
}

/// One field value. `Bytes` may carry secret material, so its `Debug`
/// output shows only the length.
#[derive(Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Device-native integer.
    Int(i32),
    /// Raw byte payload (secrets, packed records, order lists).
    Bytes(Vec<u8>),
    /// NUL-terminated string on the wire.
    Text(String),
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "Int({v})"),
            FieldValue::Bytes(b) => write!(f, "Bytes(<{} bytes>)", b.len()),
            FieldValue::Text(s) => write!(f, "Text({s:?})"),
        }
    }
}

/// One outbound (or inbound) device message: an ordered field dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceMessage {
    fields: Vec<(MessageKey, FieldValue)>,
}

impl DeviceMessage {
    /// An empty message.
    pub fn new() -> Self {
        DeviceMessage { fields: Vec::new() }
    }

    /// Append a field, returning `self` for chaining.
    pub fn with(mut self, key: MessageKey, value: FieldValue) -> Self {
        self.fields.push((key, value));
        self
    }

    /// The fields in insertion order.
    pub fn fields(&self) -> &[(MessageKey, FieldValue)] {
        &self.fields
    }

    /// First value stored under `key`.
    pub fn get(&self, key: MessageKey) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Whether a field with `key` is present.
    pub fn contains(&self, key: MessageKey) -> bool {
        self.get(key).is_some()
    }

    /// Short label for logs, derived from the leading field.
    pub fn label(&self) -> &'static str {
        match self.fields.first() {
            Some((MessageKey::SetUtcOffset, _)) => "set-utc-offset",
            Some((MessageKey::CreateToken, _)) => "create-token",
            Some((MessageKey::CreateTokenId, _)) => "create-token",
            Some((MessageKey::CreateTokenName, _)) => "create-token",
            Some((MessageKey::DeleteToken, _)) => "delete-token",
            Some((MessageKey::ClearTokens, _)) => "clear-tokens",
            Some((MessageKey::ReadTokenList, _)) => "read-token-list",
            Some((MessageKey::ReadTokenListResult, _)) => "token-record",
            Some((MessageKey::UpdateToken, _)) => "update-token",
            Some((MessageKey::SetTokenListOrder, _)) => "set-order",
            None => "empty",
        }
    }

    /// Serialize one operation into its message form.
    pub fn from_operation(operation: &Operation) -> Self {
        match operation {
            Operation::Delete(id) => DeviceMessage::new()
                .with(MessageKey::DeleteToken, FieldValue::Int(i32::from(id.0))),
            Operation::Create { id, name, secret } => DeviceMessage::new()
                .with(
                    MessageKey::CreateToken,
                    FieldValue::Bytes(secret.as_bytes().to_vec()),
                )
                .with(MessageKey::CreateTokenId, FieldValue::Int(i32::from(id.0)))
                .with(
                    MessageKey::CreateTokenName,
                    FieldValue::Text(truncated_name(name).to_owned()),
                ),
            Operation::Update { id, name } => DeviceMessage::new().with(
                MessageKey::UpdateToken,
                FieldValue::Bytes(encode_token_record(*id, name)),
            ),
            Operation::SetOrder(ids) => DeviceMessage::new().with(
                MessageKey::SetTokenListOrder,
                FieldValue::Bytes(ids.iter().map(|id| id.0).collect()),
            ),
        }
    }

    /// UTC offset announcement (signed seconds east of UTC).
    pub fn set_utc_offset(seconds: i32) -> Self {
        DeviceMessage::new().with(MessageKey::SetUtcOffset, FieldValue::Int(seconds))
    }

    /// Ask the device to report its token list, one record message per
    /// token in list order.
    pub fn read_token_list() -> Self {
        DeviceMessage::new().with(MessageKey::ReadTokenList, FieldValue::Int(1))
    }

    /// Ask the device to wipe its token list.
    pub fn clear_tokens() -> Self {
        DeviceMessage::new().with(MessageKey::ClearTokens, FieldValue::Int(1))
    }

    /// Decode the token record carried by an inbound list-result message,
    /// if this is one.
    pub fn token_list_result(&self) -> Option<Result<Token, MessageError>> {
        match self.get(MessageKey::ReadTokenListResult) {
            Some(FieldValue::Bytes(record)) => Some(decode_token_record(record)),
            _ => None,
        }
    }
}

/// Cap a name at the device's storage limit, on a char boundary.
///
/// The firmware truncates to [`MAX_NAME_LENGTH`] on receipt; truncating
/// here keeps the wire form within that cap and avoids splitting a
/// multi-byte character.
fn truncated_name(name: &str) -> &str {
    if name.len() <= MAX_NAME_LENGTH {
        return name;
    }
    let mut end = MAX_NAME_LENGTH;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// Pack a token record: id as little-endian u16, then the name bytes
/// (capped at [`MAX_NAME_LENGTH`]), NUL-terminated.
pub fn encode_token_record(id: TokenId, name: &str) -> Vec<u8> {
    let name = truncated_name(name);
    let mut record = Vec::with_capacity(RECORD_NAME_OFFSET + name.len() + 1);
    record.extend_from_slice(&u16::from(id.0).to_le_bytes());
    record.extend_from_slice(name.as_bytes());
    record.push(0);
    record
}

/// Decode a device-reported token record: id from the leading
/// little-endian u16, name from [`RECORD_NAME_OFFSET`] scanning to the
/// first NUL (the terminator may be absent in a truncated record).
pub fn decode_token_record(record: &[u8]) -> Result<Token, MessageError> {
    if record.len() < RECORD_NAME_OFFSET {
        return Err(MessageError::UnexpectedEof);
    }
    let raw_id = u16::from_le_bytes([record[0], record[1]]);
    let id = u8::try_from(raw_id).map_err(|_| MessageError::IdOutOfRange(raw_id))?;

    let name_bytes = &record[RECORD_NAME_OFFSET..];
    let name_end = name_bytes
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(name_bytes.len());
    let name = std::str::from_utf8(&name_bytes[..name_end])
        .map_err(|_| MessageError::InvalidName)?;

    Ok(Token::new(TokenId(id), name))
}
