//! Purpose: Dataset configuration and the startup catalog of connected handles.
//! Exports: `CollectionKind`, `DatasetConfig`, `Catalog`, `default_data_dir`.
//! Role: Built by the CLI from flags and passed explicitly; the core holds no global paths.
//! Invariants: Default data directory is `$RECSEARCH_DATA_DIR`, else `./data`.
//! Invariants: Each collection gets its own handle, labelled with the collection name.
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::error::{Error, ErrorKind};
use crate::core::handle::Database;
use crate::core::store::Source;

pub const DATA_DIR_ENV: &str = "RECSEARCH_DATA_DIR";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum CollectionKind {
    Users,
    Tickets,
    Organizations,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 3] = [
        CollectionKind::Users,
        CollectionKind::Tickets,
        CollectionKind::Organizations,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CollectionKind::Users => "users",
            CollectionKind::Tickets => "tickets",
            CollectionKind::Organizations => "organizations",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            CollectionKind::Users => "users.json",
            CollectionKind::Tickets => "tickets.json",
            CollectionKind::Organizations => "organizations.json",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn default_data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"))
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DatasetConfig {
    users: PathBuf,
    tickets: PathBuf,
    organizations: PathBuf,
}

impl DatasetConfig {
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            users: dir.join(CollectionKind::Users.file_name()),
            tickets: dir.join(CollectionKind::Tickets.file_name()),
            organizations: dir.join(CollectionKind::Organizations.file_name()),
        }
    }

    pub fn path(&self, kind: CollectionKind) -> &Path {
        match kind {
            CollectionKind::Users => &self.users,
            CollectionKind::Tickets => &self.tickets,
            CollectionKind::Organizations => &self.organizations,
        }
    }

    pub fn with_path(mut self, kind: CollectionKind, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match kind {
            CollectionKind::Users => self.users = path,
            CollectionKind::Tickets => self.tickets = path,
            CollectionKind::Organizations => self.organizations = path,
        }
        self
    }
}

/// One connected handle per collection, built once at startup.
#[derive(Debug)]
pub struct Catalog {
    handles: Vec<(CollectionKind, Database)>,
}

impl Catalog {
    pub fn connect(config: &DatasetConfig) -> Result<Self, Error> {
        Self::connect_only(config, &CollectionKind::ALL)
    }

    /// Connect just `kinds`; lookups for other collections fail with `NotConnected`.
    pub fn connect_only(config: &DatasetConfig, kinds: &[CollectionKind]) -> Result<Self, Error> {
        let mut handles = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            if handles.iter().any(|(seen, _)| *seen == kind) {
                continue;
            }
            let db = Database::labeled(kind.name())
                .connect(Source::path(config.path(kind)), None)?;
            handles.push((kind, db));
        }
        Ok(Self { handles })
    }

    pub fn handle(&self, kind: CollectionKind) -> Result<&Database, Error> {
        self.handles
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, db)| db)
            .ok_or_else(|| {
                Error::new(ErrorKind::NotConnected)
                    .with_message("collection was not connected at startup")
                    .with_collection(kind.name())
            })
    }

    pub fn kinds(&self) -> impl Iterator<Item = CollectionKind> + '_ {
        self.handles.iter().map(|(kind, _)| *kind)
    }
}
