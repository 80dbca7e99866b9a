/*
 * Copyright the annotation-support contributors.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Annotation consumer initialization.
//!
//! [`initialize`] runs one initialization pass over a candidate extension
//! object: it classifies the candidate's declared consumer shape, resolves an
//! annotation instance of the expected kind on the target element, and injects
//! that instance through the consumer's intake. A candidate that does not
//! participate is returned unchanged without any lookup.
//!
//! All three steps fail loudly with an [`InitializerError`]; none of the
//! failures is recovered internally. They are configuration errors in the
//! pairing of consumers and elements and are meant to abort the calling
//! context.

use crate::annotation::{AnnotationKind, AnnotationRef};
use crate::box_error::BoxError;
use crate::consumer::{ErasedAnnotationConsumer, MaybeAnnotationConsumer, ShapeBinding};
use crate::element::Element;
use std::error::Error;
use std::fmt;
use tracing::trace;

/// Runs one initialization pass over `candidate` against `element`.
///
/// If the candidate participates as an annotation consumer, its expected
/// annotation kind is resolved on `element` (searching enclosing scopes) and
/// delivered through the consumer's intake; otherwise the candidate is
/// returned untouched. The same value passed in is returned either way.
///
/// No guard against double initialization is provided: calling this twice on
/// one consumer invokes its intake twice.
///
/// # Errors
///
/// * classification: the candidate participates but declares no recognized
///   shape, or declares more than one distinct shape (ambiguous).
/// * resolution: no instance of the expected kind is attached to the element
///   or any of its enclosing scopes.
/// * injection: the consumer's own intake failed; the original failure is
///   chained as the error's source.
pub fn initialize<T>(element: &Element, mut candidate: T) -> Result<T, InitializerError>
where
    T: MaybeAnnotationConsumer,
{
    if let Some(consumer) = candidate.annotation_consumer_mut() {
        let binding = classify(&*consumer)?;
        trace!(
            "initializing `{}` as {} on element `{}`",
            consumer.consumer_type(),
            binding,
            element.name()
        );
        let annotation = resolve(element, consumer.consumer_type(), binding)?;
        inject(consumer, annotation)?;
    } else {
        trace!("candidate is not an annotation consumer, skipping initialization");
    }
    Ok(candidate)
}

/// Determines the single shape binding a consumer participates through.
///
/// Bindings are consulted most specific first. Identical re-declarations
/// collapse into one; distinct leftovers are ambiguous and rejected.
fn classify(consumer: &dyn ErasedAnnotationConsumer) -> Result<ShapeBinding, InitializerError> {
    let mut distinct: Vec<ShapeBinding> = Vec::new();
    for binding in consumer.bindings() {
        if !distinct.contains(&binding) {
            distinct.push(binding);
        }
    }
    match distinct.len() {
        0 => Err(InitializerError::no_recognized_shape(
            consumer.consumer_type(),
        )),
        1 => Ok(distinct[0]),
        _ => Err(InitializerError::ambiguous_shapes(
            consumer.consumer_type(),
            distinct,
        )),
    }
}

/// Resolves the attached annotation instance of the bound kind, delegating to
/// the element's lookup (which searches enclosing scopes).
fn resolve<'a>(
    element: &'a Element,
    consumer_type: &'static str,
    binding: ShapeBinding,
) -> Result<AnnotationRef<'a>, InitializerError> {
    element
        .find_annotation_by_kind(binding.kind())
        .ok_or_else(|| InitializerError::unresolved_annotation(consumer_type, binding.kind()))
}

/// Delivers the resolved instance through the consumer's intake, wrapping any
/// failure the intake raises.
fn inject(
    consumer: &mut dyn ErasedAnnotationConsumer,
    annotation: AnnotationRef<'_>,
) -> Result<(), InitializerError> {
    match consumer.accept_erased(annotation) {
        Ok(()) => Ok(()),
        Err(source) => Err(InitializerError::consumer_failed(
            format!("{consumer:?}"),
            source,
        )),
    }
}

/// An error occurred while initializing an annotation consumer.
///
/// These are programmer-facing configuration errors in the pairing of
/// consumers and elements; they are surfaced immediately and never retried or
/// downgraded.
#[derive(Debug)]
pub struct InitializerError {
    kind: Kind,
    source: Option<BoxError>,
}

#[derive(Debug)]
enum Kind {
    NoRecognizedShape {
        consumer_type: &'static str,
    },
    AmbiguousShapes {
        consumer_type: &'static str,
        bindings: Vec<ShapeBinding>,
    },
    UnresolvedAnnotation {
        consumer_type: &'static str,
        expected: AnnotationKind,
    },
    ConsumerFailed {
        consumer: String,
    },
}

impl InitializerError {
    fn no_recognized_shape(consumer_type: &'static str) -> Self {
        Self {
            kind: Kind::NoRecognizedShape { consumer_type },
            source: None,
        }
    }

    fn ambiguous_shapes(consumer_type: &'static str, bindings: Vec<ShapeBinding>) -> Self {
        Self {
            kind: Kind::AmbiguousShapes {
                consumer_type,
                bindings,
            },
            source: None,
        }
    }

    fn unresolved_annotation(consumer_type: &'static str, expected: AnnotationKind) -> Self {
        Self {
            kind: Kind::UnresolvedAnnotation {
                consumer_type,
                expected,
            },
            source: None,
        }
    }

    fn consumer_failed(consumer: String, source: BoxError) -> Self {
        Self {
            kind: Kind::ConsumerFailed { consumer },
            source: Some(source),
        }
    }

    /// True if classification failed (no recognized shape, or ambiguous
    /// shapes).
    pub fn is_classification(&self) -> bool {
        matches!(
            self.kind,
            Kind::NoRecognizedShape { .. } | Kind::AmbiguousShapes { .. }
        )
    }

    /// True if no annotation of the expected kind was found on the element.
    pub fn is_resolution(&self) -> bool {
        matches!(self.kind, Kind::UnresolvedAnnotation { .. })
    }

    /// True if the consumer's own intake failed. The original failure is
    /// available through [`source`](std::error::Error::source).
    pub fn is_injection(&self) -> bool {
        matches!(self.kind, Kind::ConsumerFailed { .. })
    }

    /// The annotation kind a resolution error was looking for.
    pub fn expected_kind(&self) -> Option<AnnotationKind> {
        match &self.kind {
            Kind::UnresolvedAnnotation { expected, .. } => Some(*expected),
            _ => None,
        }
    }
}

impl fmt::Display for InitializerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::NoRecognizedShape { consumer_type } => {
                write!(
                    f,
                    "`{consumer_type}` declares no recognized annotation consumer shape"
                )
            }
            Kind::AmbiguousShapes {
                consumer_type,
                bindings,
            } => {
                write!(
                    f,
                    "`{consumer_type}` declares more than one annotation consumer shape:"
                )?;
                for binding in bindings {
                    write!(f, " [{binding}]")?;
                }
                Ok(())
            }
            Kind::UnresolvedAnnotation {
                consumer_type,
                expected,
            } => {
                write!(
                    f,
                    "`{consumer_type}` must be used with an annotation of type `{expected}`"
                )
            }
            Kind::ConsumerFailed { consumer } => {
                write!(f, "failed to initialize annotation consumer: {consumer}")
            }
        }
    }
}

impl Error for InitializerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|err| err.as_ref() as _)
    }
}
