//! Generic field-by-field response builder.
//!
//! Decouples what fields a response schema declares from how handlers
//! assemble values for them. Field names are validated centrally in
//! [`Builder::set`], so a typo fails fast instead of silently producing a
//! malformed response.

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// A single declared field of a buildable schema.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    /// Wire name of the field (as serialized, not the Rust identifier).
    pub name: &'static str,
    /// Whether [`Builder::build`] requires the field to be set.
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
        }
    }
}

/// Schemas that can be assembled through [`Builder`].
///
/// `FIELDS` lists the wire fields in serialization order. The builder
/// accumulates values under these names and produces the final instance
/// by deserializing the accumulated map, so the table must agree with the
/// schema's serde representation.
pub trait Buildable: DeserializeOwned {
    /// Schema name used in error messages
    const NAME: &'static str;
    /// Declared wire fields
    const FIELDS: &'static [FieldSpec];
}

/// Field-by-field accumulator for a target schema.
///
/// One builder instance per response. `set` validates the field name
/// against the schema's declared fields; `build` checks that every
/// required field was set and produces the typed instance.
#[derive(Debug)]
pub struct Builder<T: Buildable> {
    fields: Map<String, Value>,
    _schema: PhantomData<T>,
}

impl<T: Buildable> Builder<T> {
    pub fn new() -> Self {
        Self {
            fields: Map::new(),
            _schema: PhantomData,
        }
    }

    /// Set a declared field, returning the builder for chaining.
    ///
    /// Fails with [`Error::InvalidField`] when `field` is not declared on
    /// the target schema. Setting the same field twice keeps the last
    /// value.
    pub fn set(mut self, field: &str, value: impl Serialize) -> Result<Self> {
        if !T::FIELDS.iter().any(|f| f.name == field) {
            return Err(Error::InvalidField {
                field: field.to_string(),
                schema: T::NAME,
            });
        }
        self.fields.insert(field.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Produce the final typed instance.
    ///
    /// Fails with [`Error::MissingField`] when a required field was never
    /// set.
    pub fn build(self) -> Result<T> {
        if let Some(missing) = T::FIELDS
            .iter()
            .find(|f| f.required && !self.fields.contains_key(f.name))
        {
            return Err(Error::MissingField {
                field: missing.name,
                schema: T::NAME,
            });
        }
        serde_json::from_value(Value::Object(self.fields))
            .map_err(|e| Error::Validation(format!("{}: {}", T::NAME, e)))
    }
}

impl<T: Buildable> Default for Builder<T> {
    fn default() -> Self {
        Self::new()
    }
}
