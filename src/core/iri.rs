//! Resource identifiers and the documents that own them.
//!
//! A resource such as `http://example.org/tasks/t1#it` lives in the document
//! `http://example.org/tasks/t1`; a resource without a fragment lives in the
//! document named by its parent path (`http://example.org/tasks/t1` lives in
//! `http://example.org/tasks`). Every read or write of a resource's facts goes
//! through the owning document.

use std::fmt;

use url::Url;

use crate::core::{AllocResult, AllocatorError};

/// A parsed, absolute resource identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iri {
    url: Url,
}

impl Iri {
    /// Parse an identifier, rejecting relative or opaque forms.
    pub fn parse(input: &str) -> AllocResult<Self> {
        let url = Url::parse(input)
            .map_err(|e| AllocatorError::InvalidIri(format!("`{input}`: {e}")))?;
        if url.cannot_be_a_base() || !url.has_host() {
            return Err(AllocatorError::InvalidIri(format!(
                "`{input}`: expected scheme://authority/path"
            )));
        }
        Ok(Self { url })
    }

    /// Normalized string form.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Fragment, if any.
    pub fn fragment(&self) -> Option<&str> {
        self.url.fragment()
    }

    /// Query, if any.
    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    /// Identifier of the document that stores this resource's facts.
    ///
    /// Strips the fragment when present, otherwise the query and the final
    /// path segment. Fails when there is nothing left to strip.
    pub fn document(&self) -> AllocResult<Self> {
        let mut url = self.url.clone();
        if url.fragment().is_some() {
            url.set_fragment(None);
            return Ok(Self { url });
        }

        url.set_query(None);
        let path = url.path().to_string();
        match path.rfind('/') {
            Some(idx) if path.len() > 1 => url.set_path(&path[..idx]),
            _ => {
                return Err(AllocatorError::InvalidIri(format!(
                    "`{}` has no fragment or path segment to strip",
                    self.url
                )))
            }
        }
        Ok(Self { url })
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the document identifier owning `iri`.
pub fn document_of(iri: &str) -> AllocResult<String> {
    Ok(Iri::parse(iri)?.document()?.as_str().to_string())
}
