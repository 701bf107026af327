//! Partial-update documents.

use mongodb::bson::{Bson, Document, doc};

/// Field name to new value, merged into a stored document with `$set`.
///
/// Entries keep insertion order. Setting the same field twice keeps the last
/// value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    fields: Document,
}

/// Patch over the `products` collection.
pub type ProductPatch = Patch;

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `field` unconditionally.
    pub fn set(&mut self, field: &str, value: impl Into<Bson>) -> &mut Self {
        self.fields.insert(field, value.into());
        self
    }

    /// Set `field` when a value was supplied.
    pub fn set_some<T: Into<Bson>>(&mut self, field: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.set(field, value);
        }
        self
    }

    /// Set `field` when the text was supplied and is not empty.
    pub fn set_text(&mut self, field: &str, value: Option<String>) -> &mut Self {
        self.set_some(field, value.filter(|s| !s.is_empty()))
    }

    pub fn get(&self, field: &str) -> Option<&Bson> {
        self.fields.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The update document: `{"$set": {<field>: <value>, ...}}`.
    pub fn into_update(self) -> Document {
        doc! { "$set": self.fields }
    }
}
