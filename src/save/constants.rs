/// Binary record-stream constants.
///
/// Tag values follow the length/tag-prefixed object-graph serialization
/// used by playerInfo.dat saves: a one-byte record type, then a
/// tag-specific body of little-endian i32 fields and length-prefixed
/// UTF-8 strings.
// Record type tags
pub const TAG_STREAM_HEADER: u8 = 0; // 16-byte body: root, header, major, minor
pub const TAG_STRING: u8 = 6; // id (i32) + length (i32) + UTF-8 bytes
pub const TAG_PRIMITIVE: u8 = 9; // 1-byte type selector + selector-specific body
pub const TAG_OBJECT_WITH_MAP: u8 = 12; // object id, class-name id, field count, field ids
pub const TAG_MEMBER_REF: u8 = 13; // single i32 ref id
pub const TAG_MEMBER_REF_ALT: u8 = 14; // same body as tag 13
pub const TAG_MESSAGE_END: u8 = 17; // no body, terminates the stream

// Primitive type selectors (tag 9 body)
pub const PRIM_BOOL: u8 = 1;
pub const PRIM_INT32: u8 = 8;

/// Default record budget per decode call. Bounds worst-case work on
/// garbage input; a stream that exceeds it ends `Aborted`.
pub const DEFAULT_MAX_RECORDS: usize = 500;

/// Bytes of context captured alongside an unrecognized tag.
pub const UNKNOWN_PREVIEW_LEN: usize = 16;
