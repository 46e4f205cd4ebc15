//! Shared lifecycle context.
//!
//! Owned by the process lifetime: built once before the registry starts
//! serving, handed to handlers behind an `Arc` on every invocation, and
//! dropped only at shutdown. Handlers may read it but never replace it.

use std::collections::BTreeMap;

/// A guide document: a short title and its body text.
#[derive(Debug, Clone, PartialEq)]
pub struct Doc {
    pub title: String,
    pub body: String,
}

/// In-memory store of guide documents, keyed by section then topic.
///
/// `BTreeMap` keeps enumeration in stable byte order, so listings built
/// from the store are deterministic across runs.
#[derive(Debug, Clone, Default)]
pub struct DocStore {
    sections: BTreeMap<String, BTreeMap<String, Doc>>,
}

impl DocStore {
    pub fn insert(
        &mut self,
        section: impl Into<String>,
        topic: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) {
        self.sections.entry(section.into()).or_default().insert(
            topic.into(),
            Doc {
                title: title.into(),
                body: body.into(),
            },
        );
    }

    pub fn get(&self, section: &str, topic: &str) -> Option<&Doc> {
        self.sections.get(section)?.get(topic)
    }

    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn topics<'a>(&'a self, section: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.sections
            .get(section)
            .into_iter()
            .flat_map(|topics| topics.keys().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.sections.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Process-wide state shared with handlers.
#[derive(Debug, Default)]
pub struct AppContext {
    pub docs: DocStore,
}

impl AppContext {
    pub fn new(docs: DocStore) -> Self {
        Self { docs }
    }
}
