//! The [`Group`] tree node: owned children and fields by name.

use std::any::Any;
use std::fmt;
use std::fmt::Write as _;

use indexmap::IndexMap;
use strata_catalog::Catalog;
use strata_core::Element;

use crate::array::Array;
use crate::error::StoreError;
use crate::field::{Field, FieldRef};
use crate::member::{Construct, IntoMember, Member};

/// A tree node owning named child members and named fields.
///
/// Names are unique among a group's direct children, and independently
/// unique among its direct fields; both maps preserve insertion order,
/// which is the deterministic traversal order used by input processing
/// and checkpointing. The node graph is a tree: each child has exactly
/// one owner and destruction cascades from the root through the `Box`
/// chain (children and fields drop in reverse insertion order before the
/// owning group itself).
///
/// Groups are addressed by absolute slash paths. A group created as a
/// root has path `/name`; inserting a subtree re-roots every descendant's
/// path. The path is the only upward reference a group carries — it can
/// locate a node's ancestry but never owns anything.
pub struct Group {
    name: String,
    path: String,
    children: IndexMap<String, Box<dyn Member>>,
    fields: IndexMap<String, Field>,
}

impl Group {
    /// Create an empty root group.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: format!("/{name}"),
            children: IndexMap::new(),
            fields: IndexMap::new(),
        }
    }

    /// The group's name (unique among its siblings).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The group's absolute path from the root, e.g. `/problem/regionA`.
    pub fn path(&self) -> &str {
        &self.path
    }

    // ── Children ───────────────────────────────────────────────────

    /// Idempotent typed child creation.
    ///
    /// Returns the existing child when one named `name` already exists
    /// with concrete type `T`; fails with [`StoreError::GroupTypeConflict`]
    /// when it exists with a different type; constructs, inserts, and
    /// returns a fresh `T` otherwise.
    pub fn register_group<T: Construct>(&mut self, name: &str) -> Result<&mut T, StoreError> {
        if !self.children.contains_key(name) {
            let mut child = T::construct(name);
            child.group_mut().reroot(&self.path);
            self.children.insert(name.to_string(), Box::new(child));
        }
        let child_path = format!("{}/{name}", self.path);
        let member = self
            .children
            .get_mut(name)
            .expect("inserted above")
            .as_mut();
        (member as &mut dyn Any)
            .downcast_mut::<T>()
            .ok_or_else(|| StoreError::GroupTypeConflict {
                path: child_path,
                requested: std::any::type_name::<T>(),
            })
    }

    /// Construct a child from a catalog key and insert it under `name`.
    ///
    /// This is the sole mechanism for turning input-document tags into
    /// concrete types the tree code has never seen. The catalog lookup
    /// failure propagates unchanged inside
    /// [`StoreError::UnknownChildType`], which adds this group's path.
    ///
    /// # Panics
    ///
    /// Panics if the catalog's factory violates its contract and
    /// constructs an instance with a different name than requested.
    pub fn create_child<B>(
        &mut self,
        catalog: &Catalog<B>,
        key: &str,
        name: &str,
    ) -> Result<&mut dyn Member, StoreError>
    where
        B: IntoMember + ?Sized,
    {
        if self.children.contains_key(name) {
            return Err(StoreError::DuplicateChild {
                path: format!("{}/{name}", self.path),
            });
        }
        let built = catalog
            .create(key, name)
            .map_err(|source| StoreError::UnknownChildType {
                path: self.path.clone(),
                source,
            })?;
        let mut member = built.into_member();
        assert_eq!(
            member.group().name(),
            name,
            "catalog factory for '{key}' must construct with the requested instance name"
        );
        member.group_mut().reroot(&self.path);
        self.children.insert(name.to_string(), member);
        Ok(self
            .children
            .get_mut(name)
            .expect("inserted above")
            .as_mut())
    }

    /// Look up a child by name, untyped.
    pub fn child(&self, name: &str) -> Option<&dyn Member> {
        self.children.get(name).map(|m| m.as_ref())
    }

    /// Look up a child by name, untyped, mutable.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut dyn Member> {
        self.children.get_mut(name).map(|m| m.as_mut())
    }

    /// Look up a child by name and concrete type.
    pub fn get_group<T: Member>(&self, name: &str) -> Result<&T, StoreError> {
        let member = self
            .children
            .get(name)
            .ok_or_else(|| StoreError::UnknownChild {
                path: self.path.clone(),
                name: name.to_string(),
            })?;
        (member.as_ref() as &dyn Any)
            .downcast_ref::<T>()
            .ok_or_else(|| StoreError::GroupTypeConflict {
                path: format!("{}/{name}", self.path),
                requested: std::any::type_name::<T>(),
            })
    }

    /// Look up a child by name and concrete type, mutable.
    pub fn get_group_mut<T: Member>(&mut self, name: &str) -> Result<&mut T, StoreError> {
        let child_path = format!("{}/{name}", self.path);
        let member = self
            .children
            .get_mut(name)
            .ok_or_else(|| StoreError::UnknownChild {
                path: self.path.clone(),
                name: name.to_string(),
            })?;
        (member.as_mut() as &mut dyn Any)
            .downcast_mut::<T>()
            .ok_or_else(|| StoreError::GroupTypeConflict {
                path: child_path,
                requested: std::any::type_name::<T>(),
            })
    }

    /// Whether a child named `name` exists.
    pub fn has_group(&self, name: &str) -> bool {
        self.children.contains_key(name)
    }

    /// Iterate over children in insertion order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &dyn Member)> {
        self.children.iter().map(|(n, m)| (n.as_str(), m.as_ref()))
    }

    /// Number of direct children.
    pub fn group_count(&self) -> usize {
        self.children.len()
    }

    // ── Fields ─────────────────────────────────────────────────────

    /// Idempotent typed field creation.
    ///
    /// Returns a typed handle to the existing field when one named `name`
    /// already holds element type `T`; fails with
    /// [`StoreError::FieldKindConflict`] when it holds another kind;
    /// creates a scalar field otherwise.
    pub fn register_field<T: Element>(
        &mut self,
        name: &str,
    ) -> Result<FieldRef<'_, T>, StoreError> {
        if let Some(existing) = self.fields.get(name) {
            if existing.kind() != T::KIND {
                return Err(StoreError::FieldKindConflict {
                    path: format!("{}/{name}", self.path),
                    registered: existing.kind(),
                    requested: T::KIND,
                });
            }
        } else {
            self.fields.insert(name.to_string(), Field::new::<T>(name));
        }
        let field = self.fields.get_mut(name).expect("inserted above");
        Ok(FieldRef::new(field))
    }

    /// Look up a field by name.
    pub fn get_field(&self, name: &str) -> Result<&Field, StoreError> {
        self.fields.get(name).ok_or_else(|| StoreError::UnknownField {
            path: self.path.clone(),
            name: name.to_string(),
        })
    }

    /// Look up a field by name, mutable.
    pub fn get_field_mut(&mut self, name: &str) -> Result<&mut Field, StoreError> {
        let path = self.path.clone();
        self.fields.get_mut(name).ok_or(StoreError::UnknownField {
            path,
            name: name.to_string(),
        })
    }

    /// Whether a field named `name` exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterate over fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Number of direct fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Field lookup plus typed buffer access in one step.
    ///
    /// The kind-mismatch error names the field's full path.
    pub fn get_array<T: Element>(&self, name: &str) -> Result<&Array<T>, StoreError> {
        let field = self.get_field(name)?;
        if field.kind() != T::KIND {
            return Err(StoreError::ElementKindMismatch {
                field: format!("{}/{name}", self.path),
                requested: T::KIND,
                stored: field.kind(),
            });
        }
        field.get::<T>()
    }

    /// Field lookup plus typed mutable buffer access in one step.
    pub fn get_array_mut<T: Element>(&mut self, name: &str) -> Result<&mut Array<T>, StoreError> {
        let path = format!("{}/{name}", self.path);
        let field = self.get_field_mut(name)?;
        if field.kind() != T::KIND {
            return Err(StoreError::ElementKindMismatch {
                field: path,
                requested: T::KIND,
                stored: field.kind(),
            });
        }
        field.get_mut::<T>()
    }

    // ── Phases ─────────────────────────────────────────────────────

    /// Validate input across this subtree: depth-first, insertion order.
    ///
    /// At every node, the node's own fields are resolved first (defaults
    /// applied, required-without-default failures raised with the field's
    /// full path), then the node's [`Member::process_input`] hook runs,
    /// then children recurse — a fixed order, identical across runs for
    /// the same tree, because later phases address fields by path.
    ///
    /// Calling this on a root that is itself a typed member skips the
    /// root's own hook; use [`process_input_tree`] there instead.
    pub fn process_input_recursive(&mut self) -> Result<(), StoreError> {
        self.resolve_own_fields()?;
        for child in self.children.values_mut() {
            process_input_tree(child.as_mut())?;
        }
        Ok(())
    }

    /// Resize every directly-owned field to `rows` entities.
    ///
    /// Children are not cascaded: child cardinality need not equal parent
    /// cardinality, so each group is resized by whoever knows its count.
    pub fn resize(&mut self, rows: usize) {
        for field in self.fields.values_mut() {
            field.resize(rows);
        }
    }

    /// Append an indented outline of this subtree to `out`: group names,
    /// then each field with its kind, flag, and description.
    pub fn outline(&self, out: &mut String) {
        self.outline_at(out, 0);
    }

    fn outline_at(&self, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        let _ = writeln!(out, "{pad}{}/", self.name);
        for field in self.fields.values() {
            let _ = write!(
                out,
                "{pad}  {} ({}, {})",
                field.name(),
                field.kind(),
                field.input_flag()
            );
            if field.description().is_empty() {
                let _ = writeln!(out);
            } else {
                let _ = writeln!(out, ": {}", field.description());
            }
        }
        for child in self.children.values() {
            child.group().outline_at(out, depth + 1);
        }
    }

    fn resolve_own_fields(&mut self) -> Result<(), StoreError> {
        let Self { path, fields, .. } = self;
        for field in fields.values_mut() {
            field.resolve_input(path)?;
        }
        Ok(())
    }

    /// Recompute this subtree's paths under a new parent path.
    pub(crate) fn reroot(&mut self, parent_path: &str) {
        self.path = format!("{parent_path}/{}", self.name);
        let path = self.path.clone();
        for child in self.children.values_mut() {
            child.group_mut().reroot(&path);
        }
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("path", &self.path)
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Validate input across a subtree rooted at a typed member.
///
/// Same traversal as [`Group::process_input_recursive`], but the root's
/// own [`Member::process_input`] hook runs too.
pub fn process_input_tree(member: &mut dyn Member) -> Result<(), StoreError> {
    member.group_mut().resolve_own_fields()?;
    member.process_input()?;
    for child in member.group_mut().children.values_mut() {
        process_input_tree(child.as_mut())?;
    }
    Ok(())
}
