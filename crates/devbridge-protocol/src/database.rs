//! The `Database` domain (Web SQL).

use crate::EmptyReturns;
use serde::{Deserialize, Serialize};
use serde_json::Value;

string_id!(
    /// Unique identifier of Database object.
    DatabaseId
);

/// Database object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    pub id: DatabaseId,
    pub domain: String,
    pub name: String,
    pub version: String,
}

impl Database {
    pub fn new(
        id: impl Into<DatabaseId>,
        domain: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            domain: domain.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

/// Database error reported inside a successful `executeSQL` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    pub message: String,
    pub code: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisableParams {}

impl DisableParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(DisableParams, "Database.disable", EmptyReturns);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnableParams {}

impl EnableParams {
    pub fn new() -> Self {
        Self {}
    }
}

impl_command!(EnableParams, "Database.enable", EmptyReturns);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteSqlParams {
    pub database_id: DatabaseId,
    pub query: String,
}

impl ExecuteSqlParams {
    pub fn new(database_id: impl Into<DatabaseId>, query: impl Into<String>) -> Self {
        Self {
            database_id: database_id.into(),
            query: query.into(),
        }
    }
}

/// Every field is optional: a statement that fails inside the database
/// reports `sql_error` instead of rows.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteSqlReturns {
    #[serde(default)]
    pub column_names: Option<Vec<String>>,
    #[serde(default)]
    pub values: Option<Vec<Value>>,
    #[serde(default)]
    pub sql_error: Option<Error>,
}

impl_command!(ExecuteSqlParams, "Database.executeSQL", ExecuteSqlReturns);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDatabaseTableNamesParams {
    pub database_id: DatabaseId,
}

impl GetDatabaseTableNamesParams {
    pub fn new(database_id: impl Into<DatabaseId>) -> Self {
        Self {
            database_id: database_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetDatabaseTableNamesReturns {
    pub table_names: Vec<String>,
}

impl_command!(
    GetDatabaseTableNamesParams,
    "Database.getDatabaseTableNames",
    GetDatabaseTableNamesReturns
);

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAddDatabase {
    pub database: Database,
}

impl_event!(EventAddDatabase, "Database.addDatabase");
