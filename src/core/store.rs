//! Purpose: In-memory record store: load a collection, discover its fields, answer exact-match queries.
//! Exports: `RecordStore`, `JsonStore`, `Source`, `Record`, `matches`.
//! Role: The storage seam behind `Database`; other backends implement `RecordStore`.
//! Invariants: Collection order is load order; no deduplication.
//! Invariants: The field set is computed once at load and never changes afterwards.
//! Invariants: Zero matches is an empty result, an unknown field is `FieldNotFound`.
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use serde_json::{Map, Value};

use super::error::{Error, ErrorKind};
use super::value::{FieldValue, ScalarRef, ScalarValue, json_type_name};
use crate::json::parse;

pub type Record = Map<String, Value>;

/// Where a collection comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum Source {
    Records(Vec<Value>),
    Path(PathBuf),
}

impl Source {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn records(records: impl IntoIterator<Item = Value>) -> Self {
        Self::Records(records.into_iter().collect())
    }
}

pub trait RecordStore {
    /// Ingest `source`. A store accepts exactly one successful load.
    fn load(&mut self, source: Source) -> Result<(), Error>;

    fn fields(&self) -> &BTreeSet<String>;

    fn filter(&self, field: &str, value: &ScalarValue) -> Result<Vec<&Record>, Error>;

    fn get(&self, field: &str, value: &ScalarValue) -> Result<Option<&Record>, Error>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
pub struct JsonStore {
    records: Vec<Record>,
    fields: BTreeSet<String>,
    loaded: bool,
}

impl JsonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    fn check_field(&self, field: &str) -> Result<(), Error> {
        if self.fields.contains(field) {
            return Ok(());
        }
        Err(Error::new(ErrorKind::FieldNotFound)
            .with_message(format!("no field named `{field}`"))
            .with_field(field))
    }
}

impl RecordStore for JsonStore {
    fn load(&mut self, source: Source) -> Result<(), Error> {
        if self.loaded {
            return Err(Error::new(ErrorKind::AlreadyConnected)
                .with_message("store has already been loaded"));
        }
        let items = match source {
            Source::Records(items) => items,
            Source::Path(path) => read_array(path)?,
        };
        let records = into_records(items)?;
        let fields = records
            .iter()
            .flat_map(|record| record.keys().cloned())
            .collect::<BTreeSet<_>>();

        tracing::debug!(
            records = records.len(),
            fields = fields.len(),
            "loaded collection"
        );
        self.records = records;
        self.fields = fields;
        self.loaded = true;
        Ok(())
    }

    fn fields(&self) -> &BTreeSet<String> {
        &self.fields
    }

    fn filter(&self, field: &str, value: &ScalarValue) -> Result<Vec<&Record>, Error> {
        self.check_field(field)?;
        let hits = self
            .records
            .iter()
            .filter(|record| matches(record, field, value))
            .collect::<Vec<_>>();
        tracing::debug!(field, value = %value, hits = hits.len(), "filter");
        Ok(hits)
    }

    fn get(&self, field: &str, value: &ScalarValue) -> Result<Option<&Record>, Error> {
        self.check_field(field)?;
        Ok(self
            .records
            .iter()
            .find(|record| matches(record, field, value)))
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

/// Exact-match predicate: scalar fields compare by tag and payload, list fields by membership.
pub fn matches(record: &Record, field: &str, value: &ScalarValue) -> bool {
    let Some(stored) = record.get(field) else {
        return false;
    };
    let wanted = value.as_scalar_ref();
    match FieldValue::classify(stored) {
        FieldValue::Scalar(scalar) => scalar == wanted,
        FieldValue::List(items) => items
            .iter()
            .any(|item| ScalarRef::from_json(item) == Some(wanted)),
        FieldValue::Other => false,
    }
}

fn read_array(path: PathBuf) -> Result<Vec<Value>, Error> {
    let text = fs::read_to_string(&path).map_err(|err| {
        Error::new(ErrorKind::DataFormat)
            .with_message("failed to read data source")
            .with_path(&path)
            .with_source(err)
    })?;
    parse::from_str::<Vec<Value>>(&text).map_err(|err| {
        Error::new(ErrorKind::DataFormat)
            .with_message("data source is not a JSON array")
            .with_hint(parse::hint_for_error(&err, "dataset load"))
            .with_path(&path)
            .with_source(err)
    })
}

fn into_records(items: Vec<Value>) -> Result<Vec<Record>, Error> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(Error::new(ErrorKind::DataInvalid)
                .with_message(format!(
                    "collection element is a {}, expected an object",
                    json_type_name(&other)
                ))
                .with_index(index)),
        })
        .collect()
}
