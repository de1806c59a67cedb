//! Explicit construction of new records.
//!
//! The filler never guesses how to build a record; the caller hands it a
//! `RecordFactory` alongside the records.

use crate::error::ConstructionError;
use std::fmt;

type MakeFn<R> = dyn Fn() -> Result<R, ConstructionError> + Send + Sync;

/// Builds fresh, unstamped instances of a record type.
pub struct RecordFactory<R> {
    make: Box<MakeFn<R>>,
}

impl<R> RecordFactory<R> {
    /// Wrap a fallible constructor.
    pub fn from_fn<F>(make: F) -> Self
    where
        F: Fn() -> Result<R, ConstructionError> + Send + Sync + 'static,
    {
        Self {
            make: Box::new(make),
        }
    }

    pub fn create(&self) -> Result<R, ConstructionError> {
        (self.make)()
    }
}

impl<R: Default + 'static> RecordFactory<R> {
    /// Construct with `R::default()`.
    pub fn from_default() -> Self {
        Self::from_fn(|| Ok(R::default()))
    }
}

impl<R: Clone + Send + Sync + 'static> RecordFactory<R> {
    /// Construct by cloning a template. Time fields the filler does not
    /// stamp (the minute) keep the template's value.
    pub fn prototype(template: R) -> Self {
        Self::from_fn(move || Ok(template.clone()))
    }
}

impl<R: Default + 'static> Default for RecordFactory<R> {
    fn default() -> Self {
        Self::from_default()
    }
}

impl<R> fmt::Debug for RecordFactory<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordFactory")
            .field("record", &std::any::type_name::<R>())
            .finish()
    }
}
