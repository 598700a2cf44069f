//! The [`ElementKind`] tag and the [`Element`] trait.
//!
//! Field buffers are stored type-erased; the kind tag is the runtime
//! witness of the buffer's element type. Every typed access compares tags
//! before touching the data, so a mismatch is reported as a diagnosable
//! error instead of corrupting or misreading the buffer.

use std::fmt;

/// Classification of a field's element type.
///
/// The set is closed: adding an element type means adding a variant here
/// and an [`Element`] impl for the corresponding Rust type, and the
/// compiler flags every match site that needs updating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// 32-bit signed integer (`i32`).
    I32,
    /// 64-bit signed integer (`i64`).
    I64,
    /// 32-bit floating point (`f32`).
    F32,
    /// 64-bit floating point (`f64`).
    F64,
}

impl ElementKind {
    /// Human-readable label, used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    /// Encoded width of one element in bytes.
    pub fn byte_width(&self) -> usize {
        match self {
            Self::I32 | Self::F32 => 4,
            Self::I64 | Self::F64 => 8,
        }
    }

    /// Single-byte tag used in serialized records.
    pub fn tag(&self) -> u8 {
        match self {
            Self::I32 => 0,
            Self::I64 => 1,
            Self::F32 => 2,
            Self::F64 => 3,
        }
    }

    /// Decode a serialized tag, or `None` if the tag is unknown.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::I32),
            1 => Some(Self::I64),
            2 => Some(Self::F32),
            3 => Some(Self::F64),
            _ => None,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A value type storable in a field buffer.
///
/// Binds a Rust type to its [`ElementKind`] tag and a fixed-width
/// little-endian byte codec. The codec is what makes field packing
/// generic: buffers serialize element-by-element with no knowledge of
/// the tree they live in.
///
/// # Contract
///
/// - `KIND.byte_width()` bytes are appended per `encode` call.
/// - `decode` receives exactly `KIND.byte_width()` bytes; callers are
///   responsible for slicing (and length-checking) the input.
pub trait Element: Clone + Default + PartialEq + Send + 'static {
    /// The runtime tag for this element type.
    const KIND: ElementKind;

    /// Append this value's little-endian encoding to `out`.
    fn encode(&self, out: &mut Vec<u8>);

    /// Decode a value from exactly `KIND.byte_width()` bytes.
    fn decode(bytes: &[u8]) -> Self;
}

impl Element for i32 {
    const KIND: ElementKind = ElementKind::I32;

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Self {
        i32::from_le_bytes(bytes.try_into().expect("caller slices byte_width bytes"))
    }
}

impl Element for i64 {
    const KIND: ElementKind = ElementKind::I64;

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Self {
        i64::from_le_bytes(bytes.try_into().expect("caller slices byte_width bytes"))
    }
}

impl Element for f32 {
    const KIND: ElementKind = ElementKind::F32;

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Self {
        f32::from_le_bytes(bytes.try_into().expect("caller slices byte_width bytes"))
    }
}

impl Element for f64 {
    const KIND: ElementKind = ElementKind::F64;

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Self {
        f64::from_le_bytes(bytes.try_into().expect("caller slices byte_width bytes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tags_round_trip() {
        for kind in [
            ElementKind::I32,
            ElementKind::I64,
            ElementKind::F32,
            ElementKind::F64,
        ] {
            assert_eq!(ElementKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn unknown_tag_rejected() {
        assert_eq!(ElementKind::from_tag(4), None);
        assert_eq!(ElementKind::from_tag(255), None);
    }

    #[test]
    fn byte_width_matches_encoding() {
        let mut buf = Vec::new();
        7i32.encode(&mut buf);
        assert_eq!(buf.len(), ElementKind::I32.byte_width());

        buf.clear();
        7f64.encode(&mut buf);
        assert_eq!(buf.len(), ElementKind::F64.byte_width());
    }

    proptest! {
        #[test]
        fn roundtrip_i32(v in any::<i32>()) {
            let mut buf = Vec::new();
            v.encode(&mut buf);
            prop_assert_eq!(i32::decode(&buf), v);
        }

        #[test]
        fn roundtrip_i64(v in any::<i64>()) {
            let mut buf = Vec::new();
            v.encode(&mut buf);
            prop_assert_eq!(i64::decode(&buf), v);
        }

        #[test]
        fn roundtrip_f32_bits(bits in any::<u32>()) {
            let v = f32::from_bits(bits);
            let mut buf = Vec::new();
            v.encode(&mut buf);
            prop_assert_eq!(f32::decode(&buf).to_bits(), bits);
        }

        #[test]
        fn roundtrip_f64_bits(bits in any::<u64>()) {
            let v = f64::from_bits(bits);
            let mut buf = Vec::new();
            v.encode(&mut buf);
            prop_assert_eq!(f64::decode(&buf).to_bits(), bits);
        }
    }
}
