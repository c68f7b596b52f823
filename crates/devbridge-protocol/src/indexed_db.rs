//! The `IndexedDB` domain.
//!
//! Every command that addresses a database takes the owning origin as either
//! `securityOrigin` or `storageKey`; exactly one should be set.

use crate::{EmptyReturns, runtime::RemoteObject};
use serde::{Deserialize, Serialize};

/// Database with an array of object stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseWithObjectStores {
    pub name: String,
    /// Database version (type is not `integer`, as the standard requires the
    /// version number to be `unsigned long long`).
    pub version: f64,
    pub object_stores: Vec<ObjectStore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectStore {
    pub name: String,
    pub key_path: KeyPath,
    pub auto_increment: bool,
    pub indexes: Vec<ObjectStoreIndex>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectStoreIndex {
    pub name: String,
    pub key_path: KeyPath,
    pub unique: bool,
    pub multi_entry: bool,
}

string_enum!(KeyType {
    Number => "number",
    String => "string",
    Date => "date",
    Array => "array",
});

/// Key. Array keys nest arbitrarily.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Key {
    #[serde(rename = "type")]
    pub r#type: KeyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array: Option<Vec<Key>>,
}

impl Key {
    fn empty(r#type: KeyType) -> Self {
        Self {
            r#type,
            number: None,
            string: None,
            date: None,
            array: None,
        }
    }

    pub fn number(value: f64) -> Self {
        Self {
            number: Some(value),
            ..Self::empty(KeyType::Number)
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self {
            string: Some(value.into()),
            ..Self::empty(KeyType::String)
        }
    }

    /// A date key, in milliseconds since the epoch.
    pub fn date(value: f64) -> Self {
        Self {
            date: Some(value),
            ..Self::empty(KeyType::Date)
        }
    }

    pub fn array(keys: Vec<Key>) -> Self {
        Self {
            array: Some(keys),
            ..Self::empty(KeyType::Array)
        }
    }
}

/// Key range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<Key>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<Key>,
    pub lower_open: bool,
    pub upper_open: bool,
}

impl KeyRange {
    pub fn new(lower_open: bool, upper_open: bool) -> Self {
        Self {
            lower: None,
            upper: None,
            lower_open,
            upper_open,
        }
    }

    pub fn with_lower(mut self, key: Key) -> Self {
        self.lower = Some(key);
        self
    }

    pub fn with_upper(mut self, key: Key) -> Self {
        self.upper = Some(key);
        self
    }
}

/// Data entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataEntry {
    pub key: RemoteObject,
    pub primary_key: RemoteObject,
    pub value: RemoteObject,
}

string_enum!(KeyPathType {
    Null => "null",
    String => "string",
    Array => "array",
});

/// Key path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPath {
    #[serde(rename = "type")]
    pub r#type: KeyPathType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array: Option<Vec<String>>,
}

/// Origin a command is scoped to.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageScope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_key: Option<String>,
}

macro_rules! scoped {
    ($params:ident) => {
        impl $params {
            pub fn with_security_origin(mut self, origin: impl Into<String>) -> Self {
                self.scope.security_origin = Some(origin.into());
                self
            }

            pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
                self.scope.storage_key = Some(key.into());
                self
            }
        }
    };
}

// --- Commands ---

/// Clears all entries from an object store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearObjectStoreParams {
    #[serde(flatten)]
    pub scope: StorageScope,
    pub database_name: String,
    pub object_store_name: String,
}

impl ClearObjectStoreParams {
    pub fn new(database_name: impl Into<String>, object_store_name: impl Into<String>) -> Self {
        Self {
            scope: StorageScope::default(),
            database_name: database_name.into(),
            object_store_name: object_store_name.into(),
        }
    }
}

scoped!(ClearObjectStoreParams);
impl_command!(ClearObjectStoreParams, "IndexedDB.clearObjectStore", EmptyReturns);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDatabaseParams {
    #[serde(flatten)]
    pub scope: StorageScope,
    pub database_name: String,
}

impl DeleteDatabaseParams {
    pub fn new(database_name: impl Into<String>) -> Self {
        Self {
            scope: StorageScope::default(),
            database_name: database_name.into(),
        }
    }
}

scoped!(DeleteDatabaseParams);
impl_command!(DeleteDatabaseParams, "IndexedDB.deleteDatabase", EmptyReturns);

/// Delete a range of entries from an object store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteObjectStoreEntriesParams {
    #[serde(flatten)]
    pub scope: StorageScope,
    pub database_name: String,
    pub object_store_name: String,
    /// Range of entry keys to delete.
    pub key_range: KeyRange,
}

impl DeleteObjectStoreEntriesParams {
    pub fn new(
        database_name: impl Into<String>,
        object_store_name: impl Into<String>,
        key_range: KeyRange,
    ) -> Self {
        Self {
            scope: StorageScope::default(),
            database_name: database_name.into(),
            object_store_name: object_store_name.into(),
            key_range,
        }
    }
}

scoped!(DeleteObjectStoreEntriesParams);
impl_command!(
    DeleteObjectStoreEntriesParams,
    "IndexedDB.deleteObjectStoreEntries",
    EmptyReturns
);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisableParams {}

impl DisableParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(DisableParams, "IndexedDB.disable", EmptyReturns);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnableParams {}

impl EnableParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(EnableParams, "IndexedDB.enable", EmptyReturns);

/// Requests data from object store or index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDataParams {
    #[serde(flatten)]
    pub scope: StorageScope,
    pub database_name: String,
    pub object_store_name: String,
    /// Index name. If unset, the object store itself is read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    /// Number of records to skip.
    pub skip_count: i64,
    /// Number of records to fetch.
    pub page_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_range: Option<KeyRange>,
}

impl RequestDataParams {
    pub fn new(
        database_name: impl Into<String>,
        object_store_name: impl Into<String>,
        skip_count: i64,
        page_size: i64,
    ) -> Self {
        Self {
            scope: StorageScope::default(),
            database_name: database_name.into(),
            object_store_name: object_store_name.into(),
            index_name: None,
            skip_count,
            page_size,
            key_range: None,
        }
    }

    pub fn with_index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    pub fn with_key_range(mut self, key_range: KeyRange) -> Self {
        self.key_range = Some(key_range);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDataReturns {
    pub object_store_data_entries: Vec<DataEntry>,
    /// If true, there are more entries to fetch in the given range.
    pub has_more: bool,
}

scoped!(RequestDataParams);
impl_command!(RequestDataParams, "IndexedDB.requestData", RequestDataReturns);

/// Gets metadata of an object store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMetadataParams {
    #[serde(flatten)]
    pub scope: StorageScope,
    pub database_name: String,
    pub object_store_name: String,
}

impl GetMetadataParams {
    pub fn new(database_name: impl Into<String>, object_store_name: impl Into<String>) -> Self {
        Self {
            scope: StorageScope::default(),
            database_name: database_name.into(),
            object_store_name: object_store_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMetadataReturns {
    /// The entries count.
    pub entries_count: f64,
    /// The current value of key generator, to become the next inserted key
    /// into the object store. Valid if `autoIncrement` is true.
    pub key_generator_value: f64,
}

scoped!(GetMetadataParams);
impl_command!(GetMetadataParams, "IndexedDB.getMetadata", GetMetadataReturns);

/// Requests database with given name in given frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDatabaseParams {
    #[serde(flatten)]
    pub scope: StorageScope,
    pub database_name: String,
}

impl RequestDatabaseParams {
    pub fn new(database_name: impl Into<String>) -> Self {
        Self {
            scope: StorageScope::default(),
            database_name: database_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDatabaseReturns {
    pub database_with_object_stores: DatabaseWithObjectStores,
}

scoped!(RequestDatabaseParams);
impl_command!(
    RequestDatabaseParams,
    "IndexedDB.requestDatabase",
    RequestDatabaseReturns
);

/// Requests database names for given security origin.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDatabaseNamesParams {
    #[serde(flatten)]
    pub scope: StorageScope,
}

impl RequestDatabaseNamesParams {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDatabaseNamesReturns {
    pub database_names: Vec<String>,
}

scoped!(RequestDatabaseNamesParams);
impl_command!(
    RequestDatabaseNamesParams,
    "IndexedDB.requestDatabaseNames",
    RequestDatabaseNamesReturns
);
