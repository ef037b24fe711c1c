//! Purpose: Connection-lifecycle handle that guards access to a `RecordStore`.
//! Exports: `Database`.
//! Role: What the presentation layer holds; forwards queries to the bound store.
//! Invariants: Unconnected → Connected is the only transition; a handle is never rebound.
//! Invariants: Every query on an unconnected handle fails with `NotConnected`.
use std::collections::BTreeSet;

use super::error::{Error, ErrorKind};
use super::store::{JsonStore, Record, RecordStore, Source};
use super::value::ScalarValue;

#[derive(Default)]
pub struct Database {
    label: Option<String>,
    store: Option<Box<dyn RecordStore>>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("label", &self.label)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle whose errors carry `label` as the collection name.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            store: None,
        }
    }

    /// Load `source` into `store` (a `JsonStore` when `None`) and bind it.
    pub fn connect(
        mut self,
        source: Source,
        store: Option<Box<dyn RecordStore>>,
    ) -> Result<Self, Error> {
        if self.is_connected() {
            return Err(self.annotate(
                Error::new(ErrorKind::AlreadyConnected)
                    .with_message("handle is already connected"),
            ));
        }
        let mut store: Box<dyn RecordStore> = match store {
            Some(store) => store,
            None => Box::new(JsonStore::new()),
        };
        store.load(source).map_err(|err| self.annotate(err))?;
        let collection = self.label.as_deref().unwrap_or("-");
        if store.is_empty() {
            tracing::warn!(collection, "connected to an empty dataset");
        }
        tracing::info!(
            collection,
            records = store.len(),
            fields = store.fields().len(),
            "connected"
        );
        self.store = Some(store);
        Ok(self)
    }

    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    pub fn fields(&self) -> Result<&BTreeSet<String>, Error> {
        Ok(self.backing()?.fields())
    }

    pub fn filter(&self, field: &str, value: &ScalarValue) -> Result<Vec<&Record>, Error> {
        self.backing()?
            .filter(field, value)
            .map_err(|err| self.annotate(err))
    }

    pub fn get(&self, field: &str, value: &ScalarValue) -> Result<Option<&Record>, Error> {
        self.backing()?
            .get(field, value)
            .map_err(|err| self.annotate(err))
    }

    fn backing(&self) -> Result<&dyn RecordStore, Error> {
        match &self.store {
            Some(store) => Ok(&**store),
            None => Err(self.annotate(
                Error::new(ErrorKind::NotConnected)
                    .with_message("handle is not connected to a data source")
                    .with_hint("Call connect before querying."),
            )),
        }
    }

    fn annotate(&self, err: Error) -> Error {
        match (&self.label, err.collection()) {
            (Some(label), None) => err.with_collection(label.clone()),
            _ => err,
        }
    }
}
