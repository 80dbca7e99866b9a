/*
 * Copyright the annotation-support contributors.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Utilities for type erasure.

use std::any::{type_name, Any};
use std::fmt;

type DebugFn =
    Box<dyn Fn(&Box<dyn Any + Send + Sync>, &mut fmt::Formatter<'_>) -> fmt::Result + Send + Sync>;

/// A new-type around `Box<dyn Any + Send + Sync>` that remembers how to
/// render the erased value.
///
/// Plain `dyn Any` only debug-prints as `Any { .. }`, which is useless in
/// diagnostics. `TypeErasedValue` captures a debug closure and the erased
/// type's name at construction time so that errors and logs can show the
/// actual value.
pub struct TypeErasedValue {
    value: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
    debug: DebugFn,
}

impl fmt::Debug for TypeErasedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeErasedValue[{}](", self.type_name)?;
        (self.debug)(&self.value, f)?;
        write!(f, ")")
    }
}

impl TypeErasedValue {
    /// Create a new `TypeErasedValue` from `value`.
    pub fn new<T: fmt::Debug + Send + Sync + 'static>(value: T) -> Self {
        let debug = |value: &Box<dyn Any + Send + Sync>, f: &mut fmt::Formatter<'_>| {
            fmt::Debug::fmt(value.downcast_ref::<T>().expect("type-checked"), f)
        };
        Self {
            value: Box::new(value),
            type_name: type_name::<T>(),
            debug: Box::new(debug),
        }
    }

    /// The name of the erased type.
    pub fn inner_type_name(&self) -> &'static str {
        self.type_name
    }

    /// Downcast into a `Box<T>`, or return `Self` if it is not a `T`.
    pub fn downcast<T: fmt::Debug + Send + Sync + 'static>(self) -> Result<Box<T>, Self> {
        let TypeErasedValue {
            value,
            type_name,
            debug,
        } = self;
        value.downcast().map_err(|value| Self {
            value,
            type_name,
            debug,
        })
    }

    /// Downcast as a `&T`, or return `None` if it is not a `T`.
    pub fn downcast_ref<T: fmt::Debug + Send + Sync + 'static>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    /// Downcast as a `&mut T`, or return `None` if it is not a `T`.
    pub fn downcast_mut<T: fmt::Debug + Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.value.downcast_mut()
    }
}
