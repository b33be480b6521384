//! Type marker catalogue of the binary format.
//!
//! Every node starts with one marker byte. Small integers and dictionary
//! strings are encoded entirely in the marker; everything else is followed by
//! a fixed-width little-endian payload or a length-prefixed one.

// Literal integers: value = marker - LITERAL_INT_MIN.
pub const LITERAL_INT_MIN: u8 = 0x00;
pub const LITERAL_INT_MAX: u8 = 0x1F;

// Dictionary strings.
pub const SYSTEM_STRING_1BYTE_MIN: u8 = 0x20;
pub const SYSTEM_STRING_1BYTE_MAX: u8 = 0x3F;
pub const USER_STRING_1BYTE_MIN: u8 = 0x40;
pub const USER_STRING_1BYTE_MAX: u8 = 0x5F;
pub const USER_STRING_2BYTE_MIN: u8 = 0x60;
pub const USER_STRING_2BYTE_MAX: u8 = 0x67;

// Content-shape compressed strings.
pub const LOWERCASE_GUID_STRING: u8 = 0x68;
pub const UPPERCASE_GUID_STRING: u8 = 0x69;
pub const DOUBLE_QUOTED_LOWERCASE_GUID_STRING: u8 = 0x6A;
pub const DOUBLE_QUOTED_UPPERCASE_GUID_STRING: u8 = 0x6B;
pub const COMPRESSED_LOWERCASE_HEX_STRING: u8 = 0x6C;
pub const COMPRESSED_UPPERCASE_HEX_STRING: u8 = 0x6D;
pub const COMPRESSED_DATE_TIME_STRING: u8 = 0x6E;
pub const PACKED_4BIT_STRING: u8 = 0x70;
pub const PACKED_5BIT_STRING: u8 = 0x71;
pub const PACKED_6BIT_STRING: u8 = 0x72;
pub const PACKED_7BIT_STRING_LENGTH1: u8 = 0x73;
pub const PACKED_7BIT_STRING_LENGTH2: u8 = 0x74;
pub const REFERENCE_STRING_1BYTE_OFFSET: u8 = 0x78;
pub const REFERENCE_STRING_2BYTE_OFFSET: u8 = 0x79;

// Raw strings.
pub const ENCODED_STRING_LENGTH_MIN: u8 = 0x80;
pub const ENCODED_STRING_LENGTH_MAX: u8 = 0xBF;
pub const STRING_1BYTE_LENGTH: u8 = 0xC0;
pub const STRING_2BYTE_LENGTH: u8 = 0xC1;
pub const STRING_4BYTE_LENGTH: u8 = 0xC2;

// Numbers.
pub const NUMBER_UINT8: u8 = 0xC8;
pub const NUMBER_INT16: u8 = 0xC9;
pub const NUMBER_INT32: u8 = 0xCA;
pub const NUMBER_INT64: u8 = 0xCB;
pub const NUMBER_DOUBLE: u8 = 0xCC;
pub const FLOAT32: u8 = 0xCD;
pub const FLOAT64: u8 = 0xCE;

// Other values.
pub const NULL: u8 = 0xD0;
pub const FALSE: u8 = 0xD1;
pub const TRUE: u8 = 0xD2;
pub const GUID: u8 = 0xD3;
pub const INT8: u8 = 0xD8;
pub const INT16: u8 = 0xD9;
pub const INT32: u8 = 0xDA;
pub const INT64: u8 = 0xDB;
pub const UINT32: u8 = 0xDC;
pub const BINARY_1BYTE_LENGTH: u8 = 0xDD;
pub const BINARY_2BYTE_LENGTH: u8 = 0xDE;
pub const BINARY_4BYTE_LENGTH: u8 = 0xDF;

// Containers.
pub const EMPTY_ARRAY: u8 = 0xE0;
pub const SINGLE_ITEM_ARRAY: u8 = 0xE1;
pub const ARRAY_1BYTE_LENGTH: u8 = 0xE2;
pub const ARRAY_2BYTE_LENGTH: u8 = 0xE3;
pub const ARRAY_4BYTE_LENGTH: u8 = 0xE4;
pub const EMPTY_OBJECT: u8 = 0xE8;
pub const SINGLE_PROPERTY_OBJECT: u8 = 0xE9;
pub const OBJECT_1BYTE_LENGTH: u8 = 0xEA;
pub const OBJECT_2BYTE_LENGTH: u8 = 0xEB;
pub const OBJECT_4BYTE_LENGTH: u8 = 0xEC;

/// Number of system strings addressable with a single marker byte.
pub const SYSTEM_STRING_1BYTE_COUNT: usize =
    (SYSTEM_STRING_1BYTE_MAX - SYSTEM_STRING_1BYTE_MIN) as usize + 1;
/// Number of user strings addressable with a single marker byte.
pub const USER_STRING_1BYTE_COUNT: usize =
    (USER_STRING_1BYTE_MAX - USER_STRING_1BYTE_MIN) as usize + 1;
/// Total number of user string ids (1-byte and 2-byte forms).
pub const USER_STRING_MAX_COUNT: usize =
    USER_STRING_1BYTE_COUNT + ((USER_STRING_2BYTE_MAX - USER_STRING_2BYTE_MIN) as usize + 1) * 256;
/// Longest raw string whose length fits in the marker itself.
pub const ENCODED_STRING_MAX_LEN: usize =
    (ENCODED_STRING_LENGTH_MAX - ENCODED_STRING_LENGTH_MIN) as usize;

/// Coarse shape of the node introduced by a marker byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerClass {
    Null,
    False,
    True,
    Number,
    String,
    Array,
    Object,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt32,
    Float32,
    Float64,
    Guid,
    Binary,
}

/// Classifies a marker byte, or returns `None` for unassigned values.
pub fn classify(marker: u8) -> Option<MarkerClass> {
    let class = match marker {
        LITERAL_INT_MIN..=LITERAL_INT_MAX => MarkerClass::Number,
        SYSTEM_STRING_1BYTE_MIN..=USER_STRING_2BYTE_MAX => MarkerClass::String,
        LOWERCASE_GUID_STRING..=COMPRESSED_DATE_TIME_STRING => MarkerClass::String,
        PACKED_4BIT_STRING..=PACKED_7BIT_STRING_LENGTH2 => MarkerClass::String,
        REFERENCE_STRING_1BYTE_OFFSET | REFERENCE_STRING_2BYTE_OFFSET => MarkerClass::String,
        ENCODED_STRING_LENGTH_MIN..=STRING_4BYTE_LENGTH => MarkerClass::String,
        NUMBER_UINT8..=NUMBER_DOUBLE => MarkerClass::Number,
        FLOAT32 => MarkerClass::Float32,
        FLOAT64 => MarkerClass::Float64,
        NULL => MarkerClass::Null,
        FALSE => MarkerClass::False,
        TRUE => MarkerClass::True,
        GUID => MarkerClass::Guid,
        INT8 => MarkerClass::Int8,
        INT16 => MarkerClass::Int16,
        INT32 => MarkerClass::Int32,
        INT64 => MarkerClass::Int64,
        UINT32 => MarkerClass::UInt32,
        BINARY_1BYTE_LENGTH..=BINARY_4BYTE_LENGTH => MarkerClass::Binary,
        EMPTY_ARRAY..=ARRAY_4BYTE_LENGTH => MarkerClass::Array,
        EMPTY_OBJECT..=OBJECT_4BYTE_LENGTH => MarkerClass::Object,
        _ => return None,
    };
    Some(class)
}

/// Width of the length prefix following a length-prefixed marker.
pub fn length_width(marker: u8) -> Option<usize> {
    match marker {
        STRING_1BYTE_LENGTH
        | BINARY_1BYTE_LENGTH
        | ARRAY_1BYTE_LENGTH
        | OBJECT_1BYTE_LENGTH => Some(1),
        STRING_2BYTE_LENGTH
        | BINARY_2BYTE_LENGTH
        | ARRAY_2BYTE_LENGTH
        | OBJECT_2BYTE_LENGTH => Some(2),
        STRING_4BYTE_LENGTH
        | BINARY_4BYTE_LENGTH
        | ARRAY_4BYTE_LENGTH
        | OBJECT_4BYTE_LENGTH => Some(4),
        _ => None,
    }
}

/// Length-prefixed marker for a payload of `len` bytes: `base` for a 1-byte
/// prefix, `base + 1` for 2 bytes, `base + 2` for 4 bytes.
pub fn sized_marker(base: u8, len: usize) -> (u8, usize) {
    if len <= u8::MAX as usize {
        (base, 1)
    } else if len <= u16::MAX as usize {
        (base + 1, 2)
    } else {
        (base + 2, 4)
    }
}
