/*
 * Copyright the annotation-support contributors.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Annotatable program elements and the annotation lookup collaborator.
//!
//! An [`Element`] describes a named program location (a type, method, or
//! field) together with the annotations attached to it. Elements form a chain
//! of enclosing scopes: a method element may be enclosed in a type element,
//! and lookups search from the element outward, so an annotation on an
//! enclosing scope applies unless a nearer scope overrides it with its own
//! instance of the same kind.

use crate::annotation::{Annotation, AnnotationKind, AnnotationMap, AnnotationRef};
use std::sync::Arc;

/// The category of program location an [`Element`] describes.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A type declaration.
    Type,
    /// A method or function.
    Method,
    /// A field.
    Field,
}

/// A named, annotatable program location.
#[derive(Debug)]
pub struct Element {
    kind: ElementKind,
    name: String,
    annotations: AnnotationMap,
    enclosing: Option<Arc<Element>>,
}

impl Element {
    /// Creates an element with no annotations and no enclosing scope.
    pub fn new(kind: ElementKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            annotations: AnnotationMap::new(),
            enclosing: None,
        }
    }

    /// Creates a method element.
    pub fn method(name: impl Into<String>) -> Self {
        Self::new(ElementKind::Method, name)
    }

    /// Creates a field element.
    pub fn field(name: impl Into<String>) -> Self {
        Self::new(ElementKind::Field, name)
    }

    /// Creates a type element.
    pub fn type_decl(name: impl Into<String>) -> Self {
        Self::new(ElementKind::Type, name)
    }

    /// Attaches `annotation` to this element, replacing any previous instance
    /// of the same kind.
    pub fn with_annotation<A: Annotation>(mut self, annotation: A) -> Self {
        self.annotations.insert(annotation);
        self
    }

    /// Places this element inside `enclosing`.
    pub fn enclosed_in(mut self, enclosing: impl Into<Arc<Element>>) -> Self {
        self.enclosing = Some(enclosing.into());
        self
    }

    /// The element's kind.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// The element's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The annotations attached directly to this element.
    pub fn annotations(&self) -> &AnnotationMap {
        &self.annotations
    }

    /// The enclosing scope, if any.
    pub fn enclosing(&self) -> Option<&Element> {
        self.enclosing.as_deref()
    }

    /// Finds the attached instance of kind `A`, searching this element and
    /// then its enclosing scopes. The nearest scope wins.
    pub fn find_annotation<A: Annotation>(&self) -> Option<&A> {
        self.scopes().find_map(|scope| scope.annotations.get::<A>())
    }

    /// Erased form of [`find_annotation`](Element::find_annotation), for
    /// callers that only know the kind at runtime.
    pub fn find_annotation_by_kind(&self, kind: AnnotationKind) -> Option<AnnotationRef<'_>> {
        self.scopes()
            .find_map(|scope| scope.annotations.get_by_kind(kind))
    }

    fn scopes(&self) -> ScopeIter<'_> {
        ScopeIter {
            element: Some(self),
        }
    }
}

/// Iterator from an element outward through its enclosing scopes.
struct ScopeIter<'a> {
    element: Option<&'a Element>,
}

impl<'a> Iterator for ScopeIter<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.element;
        if let Some(element) = self.element {
            self.element = element.enclosing.as_deref();
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    struct Timeout(u64);
    impl Annotation for Timeout {}

    #[derive(Debug)]
    struct CsvSource(&'static str);
    impl Annotation for CsvSource {}

    #[test]
    fn direct_lookup() {
        let element = Element::method("should_compute").with_annotation(Timeout(5));
        assert_eq!(Some(&Timeout(5)), element.find_annotation::<Timeout>());
        assert!(element.find_annotation::<CsvSource>().is_none());
    }

    #[test]
    fn enclosing_scope_is_searched() {
        let class = Element::type_decl("ComputeSuite").with_annotation(Timeout(30));
        let method = Element::method("should_compute")
            .with_annotation(CsvSource("a,b"))
            .enclosed_in(class);

        assert_eq!(Some(&Timeout(30)), method.find_annotation::<Timeout>());
        assert_eq!(
            "a,b",
            method.find_annotation::<CsvSource>().expect("attached").0
        );
    }

    #[test]
    fn nearest_scope_wins() {
        let class = Element::type_decl("ComputeSuite").with_annotation(Timeout(30));
        let method = Element::method("should_compute")
            .with_annotation(Timeout(5))
            .enclosed_in(class);

        assert_eq!(Some(&Timeout(5)), method.find_annotation::<Timeout>());
    }

    #[test]
    fn erased_lookup_walks_scopes() {
        let class = Element::type_decl("ComputeSuite").with_annotation(Timeout(30));
        let method = Element::method("should_compute").enclosed_in(class);

        let found = method
            .find_annotation_by_kind(AnnotationKind::of::<Timeout>())
            .expect("attached on enclosing scope");
        assert_eq!(Some(&Timeout(30)), found.downcast_ref::<Timeout>());
        assert!(method
            .find_annotation_by_kind(AnnotationKind::of::<CsvSource>())
            .is_none());
    }

    #[test]
    fn shared_enclosing_scope() {
        let class = Arc::new(Element::type_decl("ComputeSuite").with_annotation(Timeout(30)));
        let first = Element::method("first").enclosed_in(class.clone());
        let second = Element::method("second").enclosed_in(class);

        assert_eq!(Some(&Timeout(30)), first.find_annotation::<Timeout>());
        assert_eq!(Some(&Timeout(30)), second.find_annotation::<Timeout>());
    }
}
