//! Thin client over the hosted CRM backend.
//!
//! The backend owns storage, filtering and ordering. This module only states
//! the `list/create/update/delete` contract the auth core consumes, plus typed
//! helpers that move model structs in and out of JSON records.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use thiserror::Error;

pub mod http;
pub mod memory;
pub mod seed;

pub use http::HttpClient;
pub use memory::MemoryClient;

/// A backend record: a JSON object with a string `id` field.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    UserSessions,
    RolePermissions,
    AuditLogs,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::UserSessions => "userSessions",
            Collection::RolePermissions => "rolePermissions",
            Collection::AuditLogs => "auditLogs",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Eq(Value),
    Gte(Value),
}

/// `where` object of a list call. All conditions must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Condition)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push((field.to_string(), Condition::Eq(value.into())));
        self
    }

    pub fn gte(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.conditions
            .push((field.to_string(), Condition::Gte(value.into())));
        self
    }

    pub fn conditions(&self) -> &[(String, Condition)] {
        &self.conditions
    }

    /// Wire form: `{ "token": "...", "expiresAt": { "gte": "..." } }`.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for (field, condition) in &self.conditions {
            let value = match condition {
                Condition::Eq(v) => v.clone(),
                Condition::Gte(v) => json!({ "gte": v }),
            };
            object.insert(field.clone(), value);
        }
        Value::Object(object)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub filter: Filter,
    pub order_by: Option<OrderBy>,
}

impl ListQuery {
    pub fn filter(filter: Filter) -> Self {
        Self {
            filter,
            order_by: None,
        }
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            direction,
        });
        self
    }

    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("where".into(), self.filter.to_json());
        if let Some(order) = &self.order_by {
            let mut order_by = Map::new();
            order_by.insert(order.field.clone(), Value::from(order.direction.as_str()));
            body.insert("orderBy".into(), Value::Object(order_by));
        }
        Value::Object(body)
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{collection} record not found: {id}")]
    NotFound { collection: Collection, id: String },
    #[error("{collection} record already exists: {id}")]
    Conflict { collection: Collection, id: String },
    #[error("record is missing a string id")]
    MissingId,
    #[error("value does not serialize to a JSON object")]
    NotAnObject,
    #[error("backend responded {status}: {message}")]
    Backend { status: u16, message: String },
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

#[async_trait]
pub trait DataClient: Send + Sync {
    async fn list(&self, collection: Collection, query: ListQuery) -> ClientResult<Vec<Record>>;
    async fn create(&self, collection: Collection, record: Record) -> ClientResult<Record>;
    async fn update(&self, collection: Collection, id: &str, fields: Record)
    -> ClientResult<Record>;
    async fn delete(&self, collection: Collection, id: &str) -> ClientResult<()>;
    fn backend_name(&self) -> &'static str;
}

pub fn to_record<T: Serialize>(value: &T) -> ClientResult<Record> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Err(ClientError::NotAnObject),
    }
}

pub fn from_record<T: DeserializeOwned>(record: Record) -> ClientResult<T> {
    Ok(serde_json::from_value(Value::Object(record))?)
}

/// `list` decoded into model structs.
pub async fn list_as<T: DeserializeOwned>(
    client: &dyn DataClient,
    collection: Collection,
    query: ListQuery,
) -> ClientResult<Vec<T>> {
    client
        .list(collection, query)
        .await?
        .into_iter()
        .map(from_record)
        .collect()
}

/// `list` returning the first match only.
pub async fn first_as<T: DeserializeOwned>(
    client: &dyn DataClient,
    collection: Collection,
    query: ListQuery,
) -> ClientResult<Option<T>> {
    match client.list(collection, query).await?.into_iter().next() {
        Some(record) => Ok(Some(from_record(record)?)),
        None => Ok(None),
    }
}

pub async fn create_from<T: Serialize>(
    client: &dyn DataClient,
    collection: Collection,
    value: &T,
) -> ClientResult<Record> {
    client.create(collection, to_record(value)?).await
}
