//! Protocol constants shared with the device firmware.
//!
//! The message key values are fixed by the firmware's dictionary keys and
//! MUST NOT be changed.

// =============================================================================
// MESSAGE KEYS (device dictionary)
// =============================================================================

/// UTC offset announcement (signed seconds east of UTC).
pub const KEY_SET_UTC_OFFSET: u32 = 0;

/// Token creation: raw secret bytes.
pub const KEY_CREATE_TOKEN: u32 = 1;

/// Token creation: id assigned by the companion.
pub const KEY_CREATE_TOKEN_ID: u32 = 2;

/// Token creation: display name.
pub const KEY_CREATE_TOKEN_NAME: u32 = 3;

/// Token deletion by id.
pub const KEY_DELETE_TOKEN: u32 = 4;

/// Wipe the whole on-device list.
pub const KEY_CLEAR_TOKENS: u32 = 5;

/// Request the device's token list (one result message per token follows).
pub const KEY_READ_TOKEN_LIST: u32 = 6;

/// One token record reported by the device, in list order.
pub const KEY_READ_TOKEN_LIST_RESULT: u32 = 7;

/// Name update: packed token record.
pub const KEY_UPDATE_TOKEN: u32 = 8;

/// Full post-sync ordering: one byte per token id.
pub const KEY_SET_TOKEN_LIST_ORDER: u32 = 9;

// =============================================================================
// RECORD LAYOUT
// =============================================================================

/// Byte offset of the name field inside a packed token record
/// (preceded by the id as a little-endian u16).
pub const RECORD_NAME_OFFSET: usize = 2;

/// Maximum name length the device stores. The serializers cap names at
/// this many bytes before they go on the wire, matching the firmware's
/// own truncation on receipt.
pub const MAX_NAME_LENGTH: usize = 32;

// =============================================================================
// IDENTITY
// =============================================================================

/// Highest assignable token id. Ids travel as a single byte on the
/// order-list wire, so the editor allocates from `0..=MAX_TOKEN_ID`.
pub const MAX_TOKEN_ID: u8 = 255;
