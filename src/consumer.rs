/*
 * Copyright the annotation-support contributors.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Consumer shapes: how an extension object takes delivery of its annotation.
//!
//! An extension object participates in annotation-driven initialization by
//! implementing [`AnnotationConsumer`]. The annotation kind it expects is
//! fixed at compile time by the `Annotation` associated type, and the shape it
//! participates as is one of the closed set in [`ConsumerShape`]. Delivery
//! always happens through [`AnnotationConsumer::accept`]; the
//! [`ArgumentsProvider`] and [`ArgumentConverter`] roles add the operational
//! hooks the surrounding framework invokes after initialization.
//!
//! The initializer works against the object-safe
//! [`ErasedAnnotationConsumer`] surface, which typed consumers get for free
//! through a blanket implementation. Delegating consumers override
//! [`AnnotationConsumer::bindings`] to list their own binding before the
//! inner consumer's; the initializer consults the list most specific first.

use crate::annotation::{Annotation, AnnotationKind, AnnotationRef};
use crate::box_error::BoxError;
use crate::element::Element;
use crate::value::TypeErasedValue;
use std::any::type_name;
use std::fmt;

/// The closed set of recognized consumer shapes.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumerShape {
    /// Takes delivery of the annotation and nothing else.
    Direct,
    /// Provides argument sets for invocations of the target element.
    ArgumentProvider,
    /// Converts individual argument values for a target slot.
    ArgumentConverter,
}

impl fmt::Display for ConsumerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsumerShape::Direct => write!(f, "direct consumer"),
            ConsumerShape::ArgumentProvider => write!(f, "argument provider"),
            ConsumerShape::ArgumentConverter => write!(f, "argument converter"),
        }
    }
}

/// One declared way a consumer takes delivery of one annotation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeBinding {
    shape: ConsumerShape,
    kind: AnnotationKind,
}

impl ShapeBinding {
    /// Creates a binding of `shape` to `kind`.
    pub fn new(shape: ConsumerShape, kind: AnnotationKind) -> Self {
        Self { shape, kind }
    }

    /// The declared shape.
    pub fn shape(&self) -> ConsumerShape {
        self.shape
    }

    /// The annotation kind the consumer expects.
    pub fn kind(&self) -> AnnotationKind {
        self.kind
    }
}

impl fmt::Display for ShapeBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of `{}`", self.shape, self.kind)
    }
}

/// An extension object that configures itself from a single annotation kind.
///
/// The initializer resolves an instance of `Self::Annotation` on the target
/// element and invokes [`accept`](AnnotationConsumer::accept) with it exactly
/// once per initialization pass. Implementations typically record the
/// annotation (or values derived from it) in their own state.
pub trait AnnotationConsumer {
    /// The annotation kind this consumer must be paired with.
    type Annotation: Annotation;

    /// The shape this consumer participates as.
    ///
    /// Types implementing [`ArgumentsProvider`] or [`ArgumentConverter`]
    /// override this to the matching variant.
    const SHAPE: ConsumerShape = ConsumerShape::Direct;

    /// The shape bindings this consumer declares, most specific first.
    ///
    /// The default declares the single binding of [`Self::SHAPE`] to
    /// [`Self::Annotation`]. A delegating consumer that wraps another
    /// consumer overrides this to list its own binding first, followed by
    /// the inner consumer's bindings.
    ///
    /// [`Self::SHAPE`]: AnnotationConsumer::SHAPE
    /// [`Self::Annotation`]: AnnotationConsumer::Annotation
    fn bindings(&self) -> Vec<ShapeBinding> {
        vec![ShapeBinding::new(
            Self::SHAPE,
            AnnotationKind::of::<Self::Annotation>(),
        )]
    }

    /// Takes delivery of the resolved annotation.
    fn accept(&mut self, annotation: &Self::Annotation) -> Result<(), BoxError>;
}

/// One set of values for a single invocation of the target element.
#[derive(Debug, Default)]
pub struct ArgumentSet {
    values: Vec<TypeErasedValue>,
}

impl ArgumentSet {
    /// Creates an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value to the set.
    pub fn with(mut self, value: impl fmt::Debug + Send + Sync + 'static) -> Self {
        self.values.push(TypeErasedValue::new(value));
        self
    }

    /// The value at `index`, downcast to `T`.
    pub fn get<T: fmt::Debug + Send + Sync + 'static>(&self, index: usize) -> Option<&T> {
        self.values.get(index).and_then(TypeErasedValue::downcast_ref)
    }

    /// The erased values in order.
    pub fn values(&self) -> &[TypeErasedValue] {
        &self.values
    }

    /// The number of values in the set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the set has no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An [`AnnotationConsumer`] that supplies argument sets for invocations of
/// the target element, derived from its stored annotation.
///
/// Implementations set `const SHAPE: ConsumerShape =
/// ConsumerShape::ArgumentProvider;` in their [`AnnotationConsumer`] impl.
pub trait ArgumentsProvider: AnnotationConsumer {
    /// Produces one [`ArgumentSet`] per invocation of the target element.
    ///
    /// Called by the surrounding framework after initialization.
    fn provide_arguments(&self, context: &Element) -> Result<Vec<ArgumentSet>, BoxError>;
}

/// An [`AnnotationConsumer`] that converts individual argument values for a
/// target slot, guided by its stored annotation.
///
/// Implementations set `const SHAPE: ConsumerShape =
/// ConsumerShape::ArgumentConverter;` in their [`AnnotationConsumer`] impl.
pub trait ArgumentConverter: AnnotationConsumer {
    /// Converts `input` for the given target slot.
    ///
    /// Called by the surrounding framework after initialization, once per
    /// argument value.
    fn convert(
        &self,
        input: TypeErasedValue,
        target: &Element,
    ) -> Result<TypeErasedValue, BoxError>;
}

/// Object-safe surface the initializer works against.
///
/// Provided for every [`AnnotationConsumer`] through a blanket
/// implementation that forwards the consumer's bindings and downcasts the
/// erased instance before delivery.
pub trait ErasedAnnotationConsumer: fmt::Debug {
    /// The shape bindings this consumer declares, most specific first.
    fn bindings(&self) -> Vec<ShapeBinding>;

    /// Takes delivery of the resolved annotation in erased form.
    ///
    /// The instance is guaranteed by the initializer to be of the bound kind.
    fn accept_erased(&mut self, annotation: AnnotationRef<'_>) -> Result<(), BoxError>;

    /// The consumer's type name, used in diagnostics.
    fn consumer_type(&self) -> &'static str;
}

impl<T> ErasedAnnotationConsumer for T
where
    T: AnnotationConsumer + fmt::Debug,
{
    fn bindings(&self) -> Vec<ShapeBinding> {
        <T as AnnotationConsumer>::bindings(self)
    }

    fn accept_erased(&mut self, annotation: AnnotationRef<'_>) -> Result<(), BoxError> {
        let annotation = annotation.downcast_ref::<T::Annotation>().ok_or_else(|| {
            format!(
                "expected an annotation of type `{}`, got `{}`",
                AnnotationKind::of::<T::Annotation>(),
                annotation.kind()
            )
        })?;
        self.accept(annotation)
    }

    fn consumer_type(&self) -> &'static str {
        type_name::<T>()
    }
}

/// A candidate for annotation-driven initialization.
///
/// The default method answers "does not participate", which is the only
/// non-error early exit from [`initialize`](crate::initializer::initialize).
/// Extension objects that never consume an annotation opt out with an empty
/// impl; participating consumers override the method to hand out their
/// erased surface, which the [`impl_annotation_consumer_candidate`] macro
/// writes for them:
///
/// ```
/// use annotation_support::consumer::MaybeAnnotationConsumer;
///
/// #[derive(Debug)]
/// struct PlainExtension;
/// impl MaybeAnnotationConsumer for PlainExtension {}
/// ```
///
/// [`impl_annotation_consumer_candidate`]: crate::impl_annotation_consumer_candidate
pub trait MaybeAnnotationConsumer {
    /// Returns the consumer surface if this object participates.
    fn annotation_consumer_mut(&mut self) -> Option<&mut dyn ErasedAnnotationConsumer> {
        None
    }
}

/// Implements [`MaybeAnnotationConsumer`] for a participating consumer type.
///
/// # Example
/// ```rust,no_run
/// use annotation_support::annotation::Annotation;
/// use annotation_support::box_error::BoxError;
/// use annotation_support::consumer::AnnotationConsumer;
/// use annotation_support::impl_annotation_consumer_candidate;
///
/// #[derive(Debug)]
/// struct Marker;
/// impl Annotation for Marker {}
///
/// #[derive(Debug)]
/// struct MarkerConsumer;
/// impl AnnotationConsumer for MarkerConsumer {
///     type Annotation = Marker;
///     fn accept(&mut self, _annotation: &Marker) -> Result<(), BoxError> {
///         Ok(())
///     }
/// }
/// impl_annotation_consumer_candidate!(MarkerConsumer);
/// ```
#[macro_export]
macro_rules! impl_annotation_consumer_candidate {
    ($ty:ty) => {
        impl $crate::consumer::MaybeAnnotationConsumer for $ty {
            fn annotation_consumer_mut(
                &mut self,
            ) -> Option<&mut dyn $crate::consumer::ErasedAnnotationConsumer> {
                Some(self)
            }
        }
    };
}
