//! The [`Array`] shaped buffer underlying every field.

use smallvec::{smallvec, SmallVec};
use strata_core::Element;

use crate::error::StoreError;

/// Shape of an array: one extent per dimension, inline up to two
/// dimensions (scalar, per-entity, per-entity-with-components cover all
/// current uses; higher ranks spill to the heap transparently).
pub type Shape = SmallVec<[usize; 2]>;

/// A dense typed buffer with an explicit shape.
///
/// Data is stored flat in row-major order; `len() == product(shape)`.
/// Three layouts occur in practice:
///
/// - **Scalar** (`shape == []`): exactly one value, e.g. a configuration
///   constant. Unaffected by entity-count changes.
/// - **Per-entity** (`shape == [n]`): one value per simulation entity.
/// - **Per-entity with components** (`shape == [n, m]`): `m` values per
///   entity, e.g. a diagonal tensor per cell.
///
/// [`resize`](Array::resize) changes the *first* extent only, preserving
/// existing rows — the trailing extents describe the per-entity layout and
/// are fixed once declared.
#[derive(Clone, Debug, PartialEq)]
pub struct Array<T: Element> {
    shape: Shape,
    data: Vec<T>,
}

impl<T: Element> Array<T> {
    /// Create a scalar array holding one default value.
    pub fn new() -> Self {
        Self {
            shape: smallvec![],
            data: vec![T::default()],
        }
    }

    /// Create an empty per-entity array (`shape == [0]`).
    pub fn per_entity() -> Self {
        Self {
            shape: smallvec![0],
            data: Vec::new(),
        }
    }

    /// Create an empty per-entity array with `components` values per row
    /// (`shape == [0, components]`).
    pub fn with_components(components: usize) -> Self {
        Self {
            shape: smallvec![0, components],
            data: Vec::new(),
        }
    }

    /// The array's shape (empty for scalars).
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of stored values.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the array holds no values.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Values per row: the product of the trailing extents (1 for scalars
    /// and 1-D arrays).
    pub fn components(&self) -> usize {
        self.shape.iter().skip(1).product()
    }

    /// The scalar value.
    ///
    /// For non-scalar arrays this is the first stored value; scalar fields
    /// are the intended use.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty (a resized-to-zero per-entity array).
    pub fn value(&self) -> &T {
        &self.data[0]
    }

    /// Overwrite the scalar value.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn set_value(&mut self, value: T) {
        self.data[0] = value;
    }

    /// All values, flat, row-major.
    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// All values, flat, row-major, mutable.
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// One row of a per-entity array.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    pub fn row(&self, row: usize) -> &[T] {
        let c = self.components();
        &self.data[row * c..(row + 1) * c]
    }

    /// One row of a per-entity array, mutable.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of range.
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        let c = self.components();
        &mut self.data[row * c..(row + 1) * c]
    }

    /// Fill every stored value with `value`.
    pub fn fill(&mut self, value: &T) {
        for slot in &mut self.data {
            *slot = value.clone();
        }
    }

    /// Resize the first extent to `rows`.
    ///
    /// Existing rows are preserved up to `min(old, new)`; new rows are
    /// filled with `T::default()`. Scalar arrays have no entity extent and
    /// are left untouched — a scalar is not sized by its owner.
    pub fn resize(&mut self, rows: usize) {
        if self.shape.is_empty() {
            return;
        }
        self.shape[0] = rows;
        let total = rows * self.components();
        self.data.resize(total, T::default());
    }

    /// Append this array's shape-prefixed encoding to `out`.
    ///
    /// Layout: `u32` dimension count, one `u64` per extent, then every
    /// value little-endian in row-major order. Independent of the tree the
    /// array lives in.
    pub fn pack(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.shape.len() as u32).to_le_bytes());
        for &extent in &self.shape {
            out.extend_from_slice(&(extent as u64).to_le_bytes());
        }
        for value in &self.data {
            value.encode(out);
        }
    }

    /// Replace this array's shape and contents from a packed encoding.
    ///
    /// The payload must be exactly one [`pack`](Array::pack) output: shape
    /// header followed by `product(shape)` encoded values, nothing
    /// trailing. Unpacking the bytes packed from an array of the same
    /// element type reproduces it exactly.
    pub fn unpack(&mut self, bytes: &[u8]) -> Result<(), StoreError> {
        let width = T::KIND.byte_width();

        if bytes.len() < 4 {
            return Err(StoreError::MalformedPayload {
                detail: format!("truncated shape header: {} of 4 bytes", bytes.len()),
            });
        }
        let ndim =
            u32::from_le_bytes(bytes[0..4].try_into().expect("length checked")) as usize;

        // Sized incrementally: ndim comes from the wire and is untrusted.
        let mut offset = 4;
        let mut shape: Shape = SmallVec::new();
        let mut count: usize = 1;
        for dim in 0..ndim {
            if offset + 8 > bytes.len() {
                return Err(StoreError::MalformedPayload {
                    detail: format!("truncated extent {dim} of {ndim}"),
                });
            }
            let extent =
                u64::from_le_bytes(bytes[offset..offset + 8].try_into().expect("length checked"));
            offset += 8;
            let extent = usize::try_from(extent).map_err(|_| StoreError::MalformedPayload {
                detail: format!("extent {extent} exceeds addressable size"),
            })?;
            count = count
                .checked_mul(extent)
                .ok_or_else(|| StoreError::MalformedPayload {
                    detail: "shape product overflows".to_string(),
                })?;
            shape.push(extent);
        }

        let expected = count
            .checked_mul(width)
            .ok_or_else(|| StoreError::MalformedPayload {
                detail: "payload size overflows".to_string(),
            })?;
        let remaining = bytes.len() - offset;
        if remaining != expected {
            return Err(StoreError::MalformedPayload {
                detail: format!(
                    "payload holds {remaining} data bytes, shape {shape:?} of {} requires {expected}",
                    T::KIND
                ),
            });
        }

        let mut data = Vec::with_capacity(count);
        for _ in 0..count {
            data.push(T::decode(&bytes[offset..offset + width]));
            offset += width;
        }

        self.shape = shape;
        self.data = data;
        Ok(())
    }
}

impl<T: Element> Default for Array<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scalar_holds_one_value() {
        let mut a: Array<f64> = Array::new();
        assert_eq!(a.shape(), &[] as &[usize]);
        assert_eq!(a.len(), 1);
        a.set_value(3.5);
        assert_eq!(*a.value(), 3.5);
    }

    #[test]
    fn scalar_ignores_resize() {
        let mut a: Array<f64> = Array::new();
        a.set_value(2.0);
        a.resize(100);
        assert_eq!(a.len(), 1);
        assert_eq!(*a.value(), 2.0);
    }

    #[test]
    fn per_entity_resize_grows_with_defaults() {
        let mut a: Array<i64> = Array::per_entity();
        a.resize(3);
        a.values_mut().copy_from_slice(&[1, 2, 3]);
        a.resize(5);
        assert_eq!(a.values(), &[1, 2, 3, 0, 0]);
    }

    #[test]
    fn per_entity_resize_truncates() {
        let mut a: Array<i64> = Array::per_entity();
        a.resize(4);
        a.values_mut().copy_from_slice(&[1, 2, 3, 4]);
        a.resize(2);
        assert_eq!(a.values(), &[1, 2]);
        assert_eq!(a.shape(), &[2]);
    }

    #[test]
    fn components_preserved_across_resize() {
        let mut a: Array<f64> = Array::with_components(3);
        a.resize(2);
        assert_eq!(a.shape(), &[2, 3]);
        a.row_mut(0).copy_from_slice(&[1.0, 2.0, 3.0]);
        a.row_mut(1).copy_from_slice(&[4.0, 5.0, 6.0]);
        a.resize(3);
        assert_eq!(a.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(a.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(a.row(2), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn pack_roundtrip_scalar() {
        let mut a: Array<f64> = Array::new();
        a.set_value(-7.25);
        let mut buf = Vec::new();
        a.pack(&mut buf);

        let mut b: Array<f64> = Array::new();
        b.unpack(&buf).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn pack_roundtrip_2d() {
        let mut a: Array<f32> = Array::with_components(3);
        a.resize(2);
        a.values_mut()
            .copy_from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut buf = Vec::new();
        a.pack(&mut buf);

        let mut b: Array<f32> = Array::new();
        b.unpack(&buf).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unpack_rejects_truncated_header() {
        let mut a: Array<f64> = Array::new();
        match a.unpack(&[1, 0]) {
            Err(StoreError::MalformedPayload { detail }) => {
                assert!(detail.contains("truncated shape header"), "{detail}");
            }
            other => panic!("expected MalformedPayload, got {other:?}"),
        }
    }

    #[test]
    fn unpack_rejects_truncated_extent() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&2u32.to_le_bytes());
        buf.extend_from_slice(&3u64.to_le_bytes());
        // Second extent missing.
        let mut a: Array<f64> = Array::new();
        match a.unpack(&buf) {
            Err(StoreError::MalformedPayload { detail }) => {
                assert!(detail.contains("truncated extent 1 of 2"), "{detail}");
            }
            other => panic!("expected MalformedPayload, got {other:?}"),
        }
    }

    #[test]
    fn unpack_rejects_data_length_mismatch() {
        let mut a: Array<f64> = Array::per_entity();
        a.resize(2);
        let mut buf = Vec::new();
        a.pack(&mut buf);
        buf.pop();
        let mut b: Array<f64> = Array::new();
        match b.unpack(&buf) {
            Err(StoreError::MalformedPayload { detail }) => {
                assert!(detail.contains("data bytes"), "{detail}");
            }
            other => panic!("expected MalformedPayload, got {other:?}"),
        }
    }

    #[test]
    fn unpack_rejects_trailing_bytes() {
        let a: Array<i32> = Array::new();
        let mut buf = Vec::new();
        a.pack(&mut buf);
        buf.push(0);
        let mut b: Array<i32> = Array::new();
        assert!(matches!(
            b.unpack(&buf),
            Err(StoreError::MalformedPayload { .. })
        ));
    }

    // ── Proptest laws ───────────────────────────────────────────

    fn arb_array() -> impl Strategy<Value = Array<f64>> {
        (0usize..6, 1usize..4, prop::collection::vec(any::<u64>(), 0..24)).prop_map(
            |(rows, components, bits)| {
                let mut a: Array<f64> = Array::with_components(components);
                a.resize(rows);
                for (slot, b) in a.values_mut().iter_mut().zip(bits) {
                    *slot = f64::from_bits(b);
                }
                a
            },
        )
    }

    proptest! {
        #[test]
        fn pack_unpack_is_identity(a in arb_array()) {
            let mut buf = Vec::new();
            a.pack(&mut buf);
            let mut b: Array<f64> = Array::new();
            b.unpack(&buf).unwrap();
            prop_assert_eq!(a.shape(), b.shape());
            // Bit-exact comparison: NaN payloads must survive.
            let a_bits: Vec<u64> = a.values().iter().map(|v| v.to_bits()).collect();
            let b_bits: Vec<u64> = b.values().iter().map(|v| v.to_bits()).collect();
            prop_assert_eq!(a_bits, b_bits);
        }

        #[test]
        fn resize_preserves_prefix(a in arb_array(), grow in 0usize..8) {
            let rows = a.shape()[0];
            let prefix: Vec<f64> = a.values().to_vec();
            let mut grown = a.clone();
            grown.resize(rows + grow);
            prop_assert_eq!(&grown.values()[..prefix.len()], prefix.as_slice());
            prop_assert!(grown.values()[prefix.len()..].iter().all(|&v| v == 0.0));
        }

        #[test]
        fn resize_then_resize_back_zeroes_tail(a in arb_array()) {
            let rows = a.shape()[0];
            let mut b = a.clone();
            b.resize(0);
            b.resize(rows);
            prop_assert_eq!(b.len(), a.len());
            prop_assert!(b.values().iter().all(|&v| v == 0.0));
        }
    }
}
