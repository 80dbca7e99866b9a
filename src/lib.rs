/*
 * Copyright the annotation-support contributors.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Annotation-driven initialization for framework extension points.
//!
//! A framework that pairs extension objects with program elements can let
//! those objects configure themselves from declarative metadata: an object
//! declares the annotation kind it expects, the framework resolves an
//! instance of that kind attached to the target element (or one of its
//! enclosing scopes), and hands it over in a single initialization pass.
//!
//! The flow is classify → resolve → inject, driven by
//! [`initialize`](initializer::initialize):
//!
//! ```
//! use annotation_support::annotation::Annotation;
//! use annotation_support::box_error::BoxError;
//! use annotation_support::consumer::AnnotationConsumer;
//! use annotation_support::element::Element;
//! use annotation_support::impl_annotation_consumer_candidate;
//! use annotation_support::initializer::initialize;
//!
//! #[derive(Debug)]
//! struct ValueSource {
//!     value: &'static str,
//! }
//! impl Annotation for ValueSource {}
//!
//! #[derive(Debug, Default)]
//! struct ValueConsumer {
//!     recorded: Option<String>,
//! }
//! impl AnnotationConsumer for ValueConsumer {
//!     type Annotation = ValueSource;
//!
//!     fn accept(&mut self, annotation: &ValueSource) -> Result<(), BoxError> {
//!         self.recorded = Some(annotation.value.to_string());
//!         Ok(())
//!     }
//! }
//! impl_annotation_consumer_candidate!(ValueConsumer);
//!
//! let element = Element::method("should_compute")
//!     .with_annotation(ValueSource { value: "v" });
//! let consumer = initialize(&element, ValueConsumer::default())?;
//! assert_eq!(Some("v".to_string()), consumer.recorded);
//! # Ok::<_, annotation_support::initializer::InitializerError>(())
//! ```

#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod annotation;
pub mod box_error;
pub mod consumer;
pub mod element;
pub mod initializer;
pub mod value;

pub use initializer::{initialize, InitializerError};
