//! The [`Field`] wrapper: a named, type-erased, owned data buffer.

use std::any::Any;

use strata_core::{Element, ElementKind, InputFlag};

use crate::array::Array;
use crate::error::StoreError;

/// Object-safe view of a typed buffer.
///
/// The concrete type behind this trait is always `Typed<T>` for the `T`
/// recorded in the field's kind tag; every typed access checks the tag
/// before downcasting.
trait ErasedArray: Any + Send {
    fn kind(&self) -> ElementKind;
    fn shape(&self) -> &[usize];
    fn resize(&mut self, rows: usize);
    fn pack(&self, out: &mut Vec<u8>);
    fn unpack(&mut self, bytes: &[u8]) -> Result<(), StoreError>;
    fn has_default(&self) -> bool;
    fn apply_default(&mut self);
}

/// Typed storage slot: the buffer plus its optional default value.
struct Typed<T: Element> {
    default: Option<T>,
    array: Array<T>,
}

impl<T: Element> ErasedArray for Typed<T> {
    fn kind(&self) -> ElementKind {
        T::KIND
    }

    fn shape(&self) -> &[usize] {
        self.array.shape()
    }

    fn resize(&mut self, rows: usize) {
        let old_len = self.array.len();
        self.array.resize(rows);
        let new_len = self.array.len();
        if let Some(default) = &self.default {
            for slot in &mut self.array.values_mut()[old_len.min(new_len)..] {
                *slot = default.clone();
            }
        }
    }

    fn pack(&self, out: &mut Vec<u8>) {
        self.array.pack(out);
    }

    fn unpack(&mut self, bytes: &[u8]) -> Result<(), StoreError> {
        self.array.unpack(bytes)
    }

    fn has_default(&self) -> bool {
        self.default.is_some()
    }

    fn apply_default(&mut self) {
        if let Some(default) = self.default.clone() {
            self.array.fill(&default);
        }
    }
}

/// A named, type-erased data buffer with input metadata.
///
/// Fields are exclusively owned by one group and carry: the element-kind
/// tag fixed at creation, an input flag, a description, an optional
/// default value, and whether input supplied a value. The tag is checked
/// on every typed access — the buffer itself is opaque.
pub struct Field {
    name: String,
    description: String,
    flag: InputFlag,
    supplied: bool,
    /// Whether the owning group's entity count governs this buffer's first
    /// extent. Fixed-extent input arrays (e.g. a 3-component tensor read
    /// from the input document) opt out.
    sized_from_parent: bool,
    data: Box<dyn ErasedArray>,
}

impl Field {
    /// Create a scalar field of element type `T`.
    ///
    /// New fields start as `NoWrite` (not assignable from input) with no
    /// default and an empty description; registration sites configure the
    /// rest through the returned [`FieldRef`].
    pub fn new<T: Element>(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            flag: InputFlag::NoWrite,
            supplied: false,
            sized_from_parent: true,
            data: Box::new(Typed::<T> {
                default: None,
                array: Array::new(),
            }),
        }
    }

    /// The field's name (unique among its group's fields).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element-kind tag fixed at creation.
    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    /// The buffer's current shape (empty for scalars).
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// The input flag.
    pub fn input_flag(&self) -> InputFlag {
        self.flag
    }

    /// The human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether input assigned this field a value.
    pub fn was_supplied(&self) -> bool {
        self.supplied
    }

    /// Record that input assigned this field a value.
    ///
    /// Called by the input-processing collaborator (or the typed write
    /// helpers) so that input validation does not overwrite the value
    /// with a default.
    pub fn mark_supplied(&mut self) {
        self.supplied = true;
    }

    /// Typed read access to the buffer.
    ///
    /// Fails with [`StoreError::ElementKindMismatch`] when `T` does not
    /// match the stored kind tag.
    pub fn get<T: Element>(&self) -> Result<&Array<T>, StoreError> {
        self.check_kind::<T>()?;
        let typed = (self.data.as_ref() as &dyn Any)
            .downcast_ref::<Typed<T>>()
            .expect("kind tag matches the stored element type");
        Ok(&typed.array)
    }

    /// Typed write access to the buffer.
    ///
    /// Fails with [`StoreError::ElementKindMismatch`] when `T` does not
    /// match the stored kind tag.
    pub fn get_mut<T: Element>(&mut self) -> Result<&mut Array<T>, StoreError> {
        self.check_kind::<T>()?;
        let typed = (self.data.as_mut() as &mut dyn Any)
            .downcast_mut::<Typed<T>>()
            .expect("kind tag matches the stored element type");
        Ok(&mut typed.array)
    }

    /// Resize the buffer to `rows` entities.
    ///
    /// No-op for scalars and for fixed-extent fields; new rows take the
    /// field's default value when one is set, `T::default()` otherwise.
    pub fn resize(&mut self, rows: usize) {
        if self.sized_from_parent {
            self.data.resize(rows);
        }
    }

    /// Serialize the buffer (shape included) into `out`.
    pub fn pack(&self, out: &mut Vec<u8>) {
        self.data.pack(out);
    }

    /// Replace the buffer's shape and contents from a packed payload.
    ///
    /// The payload must have been produced by [`pack`](Field::pack) on a
    /// field of the same element kind; the caller checks the kind tag.
    pub fn unpack(&mut self, bytes: &[u8]) -> Result<(), StoreError> {
        self.data.unpack(bytes)
    }

    /// Apply input-validation rules for this field.
    ///
    /// `NoWrite` fields are skipped. An unsupplied field takes its default
    /// when one exists; a `Required` field with neither a supplied value
    /// nor a default fails with its full path.
    pub(crate) fn resolve_input(&mut self, owner_path: &str) -> Result<(), StoreError> {
        if self.flag == InputFlag::NoWrite || self.supplied {
            return Ok(());
        }
        if self.data.has_default() {
            self.data.apply_default();
            return Ok(());
        }
        if self.flag == InputFlag::Required {
            return Err(StoreError::MissingRequiredInput {
                path: format!("{owner_path}/{}", self.name),
            });
        }
        Ok(())
    }

    fn check_kind<T: Element>(&self) -> Result<(), StoreError> {
        if self.data.kind() != T::KIND {
            return Err(StoreError::ElementKindMismatch {
                field: self.name.clone(),
                requested: T::KIND,
                stored: self.data.kind(),
            });
        }
        Ok(())
    }

    fn typed_mut<T: Element>(&mut self) -> &mut Typed<T> {
        (self.data.as_mut() as &mut dyn Any)
            .downcast_mut::<Typed<T>>()
            .expect("FieldRef is only constructed for the registered element type")
    }
}

/// Typed configuration handle returned by field registration.
///
/// Builder-style setters consume and return the handle so registration
/// reads as one chain:
///
/// ```
/// use strata_core::InputFlag;
/// use strata_store::Group;
///
/// let mut group = Group::new("region");
/// group
///     .register_field::<f64>("porosity")?
///     .set_default(0.3)
///     .set_input_flag(InputFlag::Optional)
///     .set_description("Reference porosity of the region");
/// # Ok::<(), strata_store::StoreError>(())
/// ```
pub struct FieldRef<'a, T: Element> {
    field: &'a mut Field,
    _marker: std::marker::PhantomData<T>,
}

impl<'a, T: Element> FieldRef<'a, T> {
    /// Wrap a field whose kind tag is already known to match `T`.
    pub(crate) fn new(field: &'a mut Field) -> Self {
        Self {
            field,
            _marker: std::marker::PhantomData,
        }
    }

    /// Record the default value substituted for unsupplied input.
    ///
    /// Metadata only: the buffer's current contents are untouched until
    /// input processing (or a growing resize) applies the default.
    pub fn set_default(self, value: T) -> Self {
        self.field.typed_mut::<T>().default = Some(value);
        self
    }

    /// Set the input flag.
    pub fn set_input_flag(self, flag: InputFlag) -> Self {
        self.field.flag = flag;
        self
    }

    /// Set the human-readable description.
    pub fn set_description(self, text: &str) -> Self {
        self.field.description = text.to_string();
        self
    }

    /// Declare a per-entity layout: one value per entity, sized by the
    /// owning group's resize. Discards current contents.
    pub fn set_per_entity(self) -> Self {
        self.field.typed_mut::<T>().array = Array::per_entity();
        self.field.sized_from_parent = true;
        self
    }

    /// Declare a per-entity layout with `components` values per entity.
    /// Discards current contents.
    pub fn set_components(self, components: usize) -> Self {
        self.field.typed_mut::<T>().array = Array::with_components(components);
        self.field.sized_from_parent = true;
        self
    }

    /// Declare a fixed 1-D layout of `extent` values, decoupled from the
    /// owning group's entity count (e.g. a tensor read from input).
    /// Discards current contents.
    pub fn set_extent(self, extent: usize) -> Self {
        let mut array = Array::per_entity();
        array.resize(extent);
        self.field.typed_mut::<T>().array = array;
        self.field.sized_from_parent = false;
        self
    }

    /// Assign the scalar value and mark the field as supplied by input.
    pub fn assign(self, value: T) -> Self {
        self.field.typed_mut::<T>().array.set_value(value);
        self.field.supplied = true;
        self
    }

    /// Assign 1-D contents and mark the field as supplied by input.
    ///
    /// The buffer takes shape `[values.len()]`; fixed-extent fields are
    /// length-validated afterwards by their owner's post-input hook.
    pub fn assign_slice(self, values: &[T]) -> Self {
        let typed = self.field.typed_mut::<T>();
        let mut array = Array::per_entity();
        array.resize(values.len());
        array.values_mut().clone_from_slice(values);
        typed.array = array;
        self.field.supplied = true;
        self
    }

    /// Read access to the typed buffer.
    pub fn array(&self) -> &Array<T> {
        &(self.field.data.as_ref() as &dyn Any)
            .downcast_ref::<Typed<T>>()
            .expect("FieldRef is only constructed for the registered element type")
            .array
    }

    /// Write access to the typed buffer.
    pub fn array_mut(&mut self) -> &mut Array<T> {
        &mut self.field.typed_mut::<T>().array
    }

    /// The wrapped field.
    pub fn field(&self) -> &Field {
        self.field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tag_guards_access() {
        let field = Field::new::<f64>("pressure");
        assert_eq!(field.kind(), ElementKind::F64);
        assert!(field.get::<f64>().is_ok());
        match field.get::<i32>() {
            Err(StoreError::ElementKindMismatch {
                field,
                requested,
                stored,
            }) => {
                assert_eq!(field, "pressure");
                assert_eq!(requested, ElementKind::I32);
                assert_eq!(stored, ElementKind::F64);
            }
            other => panic!("expected ElementKindMismatch, got {other:?}"),
        }
    }

    #[test]
    fn builder_chain_records_metadata() {
        let mut field = Field::new::<f64>("porosity");
        FieldRef::<f64>::new(&mut field)
            .set_default(0.3)
            .set_input_flag(InputFlag::Optional)
            .set_description("Reference porosity");
        assert_eq!(field.input_flag(), InputFlag::Optional);
        assert_eq!(field.description(), "Reference porosity");
        // Metadata only: the buffer still holds the element default.
        assert_eq!(*field.get::<f64>().unwrap().value(), 0.0);
    }

    #[test]
    fn resolve_applies_default_when_unsupplied() {
        let mut field = Field::new::<f64>("porosity");
        FieldRef::<f64>::new(&mut field)
            .set_default(1.0)
            .set_input_flag(InputFlag::Optional);
        field.resolve_input("/problem/regionA").unwrap();
        assert_eq!(*field.get::<f64>().unwrap().value(), 1.0);
    }

    #[test]
    fn resolve_keeps_supplied_value() {
        let mut field = Field::new::<f64>("porosity");
        FieldRef::<f64>::new(&mut field)
            .set_default(1.0)
            .set_input_flag(InputFlag::Optional)
            .assign(0.25);
        field.resolve_input("/problem/regionA").unwrap();
        assert_eq!(*field.get::<f64>().unwrap().value(), 0.25);
    }

    #[test]
    fn resolve_fails_for_unset_required_without_default() {
        let mut field = Field::new::<f64>("density");
        FieldRef::<f64>::new(&mut field).set_input_flag(InputFlag::Required);
        match field.resolve_input("/problem/regionA") {
            Err(StoreError::MissingRequiredInput { path }) => {
                assert_eq!(path, "/problem/regionA/density");
            }
            other => panic!("expected MissingRequiredInput, got {other:?}"),
        }
    }

    #[test]
    fn resolve_accepts_required_with_default() {
        let mut field = Field::new::<f64>("density");
        FieldRef::<f64>::new(&mut field)
            .set_default(2700.0)
            .set_input_flag(InputFlag::Required);
        field.resolve_input("/problem").unwrap();
        assert_eq!(*field.get::<f64>().unwrap().value(), 2700.0);
    }

    #[test]
    fn resolve_skips_no_write_fields() {
        let mut field = Field::new::<f64>("internalState");
        // NoWrite is the default flag; required-style absence must not error.
        field.resolve_input("/problem").unwrap();
    }

    #[test]
    fn resize_fills_new_rows_with_field_default() {
        let mut field = Field::new::<f64>("saturation");
        FieldRef::<f64>::new(&mut field)
            .set_per_entity()
            .set_default(1.0);
        field.resize(3);
        assert_eq!(field.get::<f64>().unwrap().values(), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn fixed_extent_ignores_owner_resize() {
        let mut field = Field::new::<f64>("components");
        FieldRef::<f64>::new(&mut field)
            .set_extent(3)
            .assign_slice(&[1.0, 2.0, 3.0]);
        field.resize(100);
        assert_eq!(field.get::<f64>().unwrap().values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn pack_unpack_roundtrip_through_erased_interface() {
        let mut field = Field::new::<i64>("ids");
        FieldRef::<i64>::new(&mut field).set_per_entity();
        field.resize(4);
        field
            .get_mut::<i64>()
            .unwrap()
            .values_mut()
            .copy_from_slice(&[10, 20, 30, 40]);

        let mut buf = Vec::new();
        field.pack(&mut buf);

        let mut fresh = Field::new::<i64>("ids");
        fresh.unpack(&buf).unwrap();
        assert_eq!(fresh.get::<i64>().unwrap().values(), &[10, 20, 30, 40]);
        assert_eq!(fresh.shape(), &[4]);
    }
}
