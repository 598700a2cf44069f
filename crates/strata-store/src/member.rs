//! The [`Member`] and [`Construct`] traits for typed tree nodes.

use std::any::Any;

use crate::error::StoreError;
use crate::group::Group;

/// A typed tree node: a concrete type that embeds a [`Group`] and lives
/// as an owned child inside another group.
///
/// Concrete implementations (material models, boundary conditions, mesh
/// importers, …) register their own fields on the embedded group during
/// construction and may override [`process_input`](Member::process_input)
/// to validate assembled input or derive dependent values.
///
/// `Group` itself implements `Member`, so plain untyped containers need
/// no wrapper type.
pub trait Member: Any + Send {
    /// The embedded tree node.
    fn group(&self) -> &Group;

    /// The embedded tree node, mutable.
    fn group_mut(&mut self) -> &mut Group;

    /// Hook invoked by input processing after this node's own fields have
    /// been validated and defaulted, before its children are visited.
    ///
    /// Default: no-op.
    fn process_input(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// A member constructible from an instance name alone.
///
/// Used by [`Group::register_group`] for idempotent typed creation;
/// catalog factories typically delegate to the same constructor.
pub trait Construct: Member + Sized {
    /// Construct a fresh instance named `name`, registering its fields.
    fn construct(name: &str) -> Self;
}

impl Member for Group {
    fn group(&self) -> &Group {
        self
    }

    fn group_mut(&mut self) -> &mut Group {
        self
    }
}

impl Construct for Group {
    fn construct(name: &str) -> Self {
        Group::new(name)
    }
}

/// Conversion from an owned abstract-base box into an owned tree member.
///
/// [`Group::create_child`] is generic over the catalog's base type; this
/// trait is the bridge that lets a `Box<dyn SomeBase>` produced by a
/// catalog be stored as a `Box<dyn Member>` child. Implement it for each
/// abstract base trait (`impl IntoMember for dyn SomeBase`) — the body is
/// always the identity upcast.
pub trait IntoMember {
    /// Upcast into an owned tree member.
    fn into_member(self: Box<Self>) -> Box<dyn Member>;
}

impl<T: Member> IntoMember for T {
    fn into_member(self: Box<Self>) -> Box<dyn Member> {
        self
    }
}

impl IntoMember for dyn Member {
    fn into_member(self: Box<Self>) -> Box<dyn Member> {
        self
    }
}
