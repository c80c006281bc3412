//! Key and collection-name escaping for MongoDB.
//!
//! MongoDB interprets dots and dollar signs in field names as path and operator syntax,
//! and rejects NUL bytes outright. Client documents are arbitrary JSON, so their keys are
//! escaped on the way in and restored on the way out. Values are never touched.
//!
//! Escapes are `%XX` sequences, and `%` escapes itself, so restoring is exact for every
//! input, including names that already look escaped.

use bson::{Bson, Document};


pub(crate) struct KeySanitizer;

impl KeySanitizer {
    const REPLACEMENTS: [(char, &'static str); 4] = [
        ('%', "%25"),
        ('.', "%2E"),
        ('$', "%24"),
        ('\0', "%00"),
    ];

    /// Recursively escapes the keys of every document inside `value`.
    pub(crate) fn sanitize_value(value: &Bson) -> Bson {
        match value {
            Bson::Array(arr) => Bson::Array(arr.iter().map(Self::sanitize_value).collect()),
            Bson::Document(doc) => Bson::Document(Self::sanitize_document(doc)),
            _ => value.clone(),
        }
    }

    pub(crate) fn sanitize_document(doc: &Document) -> Document {
        doc.iter()
            .map(|(k, v)| (Self::sanitize_string(k), Self::sanitize_value(v)))
            .collect()
    }

    pub(crate) fn sanitize_string(input: &str) -> String {
        let mut sanitized = String::with_capacity(input.len());
        for c in input.chars() {
            match Self::REPLACEMENTS.iter().find(|(target, _)| *target == c) {
                Some((_, replacement)) => sanitized.push_str(replacement),
                None => sanitized.push(c),
            }
        }
        sanitized
    }

    /// Inverse of [`KeySanitizer::sanitize_value`].
    pub(crate) fn restore_value(value: &Bson) -> Bson {
        match value {
            Bson::Array(arr) => Bson::Array(arr.iter().map(Self::restore_value).collect()),
            Bson::Document(doc) => Bson::Document(Self::restore_document(doc)),
            _ => value.clone(),
        }
    }

    pub(crate) fn restore_document(doc: &Document) -> Document {
        doc.iter()
            .map(|(k, v)| (Self::restore_string(k), Self::restore_value(v)))
            .collect()
    }

    /// Inverse of [`KeySanitizer::sanitize_string`]. A `%` not starting a known escape
    /// is kept as is.
    pub(crate) fn restore_string(input: &str) -> String {
        let mut restored = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(pos) = rest.find('%') {
            restored.push_str(&rest[..pos]);
            rest = &rest[pos..];

            let escape = rest.get(..3);
            match Self::REPLACEMENTS.iter().find(|(_, replacement)| Some(*replacement) == escape) {
                Some((target, replacement)) => {
                    restored.push(*target);
                    rest = &rest[replacement.len()..];
                }
                None => {
                    restored.push('%');
                    rest = &rest[1..];
                }
            }
        }

        restored.push_str(rest);
        restored
    }
}
