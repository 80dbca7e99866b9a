/*
 * Copyright the annotation-support contributors.
 * SPDX-License-Identifier: Apache-2.0
 */

//! The annotation model: kinds, instances, and per-element storage.
//!
//! An annotation kind is an ordinary Rust type implementing the [`Annotation`]
//! marker trait. An instance of that type is the attached metadata value.
//! [`AnnotationMap`] stores at most one instance per kind, keyed by the kind's
//! [`TypeId`].

use crate::value::TypeErasedValue;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Marker trait for annotation kinds.
///
/// Implement this for any type that represents a category of declarative
/// metadata attachable to an [`Element`](crate::element::Element):
///
/// ```
/// use annotation_support::annotation::Annotation;
///
/// #[derive(Debug)]
/// struct CsvSource {
///     delimiter: char,
/// }
/// impl Annotation for CsvSource {}
/// ```
pub trait Annotation: fmt::Debug + Send + Sync + 'static {}

/// A runtime descriptor for an annotation kind.
///
/// Two `AnnotationKind`s are equal exactly when they describe the same Rust
/// type.
#[derive(Clone, Copy)]
pub struct AnnotationKind {
    id: TypeId,
    name: &'static str,
}

impl AnnotationKind {
    /// The kind descriptor for annotation type `A`.
    pub fn of<A: Annotation>() -> Self {
        Self {
            id: TypeId::of::<A>(),
            name: type_name::<A>(),
        }
    }

    /// The full name of the annotation type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for AnnotationKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AnnotationKind {}

impl std::hash::Hash for AnnotationKind {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnnotationKind").field(&self.name).finish()
    }
}

/// Renders the full module path of the annotation type, not just the bare
/// type name, so diagnostics stay unambiguous when two kinds share a name.
impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug)]
pub(crate) struct ErasedAnnotation {
    kind: AnnotationKind,
    value: TypeErasedValue,
}

/// A borrowed, type-erased view of an annotation instance.
///
/// Produced by the lookup on [`Element`](crate::element::Element) and consumed
/// by the erased intake of a consumer, which downcasts it back to the concrete
/// kind.
#[derive(Clone, Copy)]
pub struct AnnotationRef<'a> {
    inner: &'a ErasedAnnotation,
}

impl<'a> AnnotationRef<'a> {
    /// The kind of the referenced instance.
    pub fn kind(&self) -> AnnotationKind {
        self.inner.kind
    }

    /// Downcast to a concrete annotation kind.
    pub fn downcast_ref<A: Annotation>(&self) -> Option<&'a A> {
        self.inner.value.downcast_ref()
    }
}

impl fmt::Debug for AnnotationRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner.value, f)
    }
}

/// Kind-keyed annotation storage.
///
/// Holds at most one instance per kind; inserting a second instance of the
/// same kind replaces the first. Callers that need repeated-annotation
/// semantics must model them inside a single annotation type.
#[derive(Debug, Default)]
pub struct AnnotationMap {
    entries: HashMap<TypeId, ErasedAnnotation>,
}

impl AnnotationMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `annotation`, replacing any previous instance of the same kind.
    pub fn insert<A: Annotation>(&mut self, annotation: A) {
        let kind = AnnotationKind::of::<A>();
        self.entries.insert(
            kind.id(),
            ErasedAnnotation {
                kind,
                value: TypeErasedValue::new(annotation),
            },
        );
    }

    /// Retrieves the instance of kind `A`, if attached.
    pub fn get<A: Annotation>(&self) -> Option<&A> {
        self.entries
            .get(&TypeId::of::<A>())
            .map(|entry| entry.value.downcast_ref().expect("type-checked"))
    }

    /// Retrieves the instance of the given kind in erased form, if attached.
    pub fn get_by_kind(&self, kind: AnnotationKind) -> Option<AnnotationRef<'_>> {
        self.entries
            .get(&kind.id())
            .map(|inner| AnnotationRef { inner })
    }

    /// Returns true if an instance of the given kind is attached.
    pub fn contains(&self, kind: AnnotationKind) -> bool {
        self.entries.contains_key(&kind.id())
    }

    /// Iterates over the kinds with attached instances.
    pub fn kinds(&self) -> impl Iterator<Item = AnnotationKind> + '_ {
        self.entries.values().map(|entry| entry.kind)
    }

    /// The number of attached instances.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
