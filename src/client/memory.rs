use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{
    ClientError, ClientResult, Collection, Condition, DataClient, Direction, ListQuery, Record,
    seed,
};

/// In-process stand-in for the hosted backend.
///
/// Evaluates `where`/`orderBy` the way the backend does: equality on any JSON
/// value, `gte` on numbers and on RFC 3339 timestamps (compared as instants).
#[derive(Default)]
pub struct MemoryClient {
    collections: RwLock<HashMap<Collection, Vec<Record>>>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Demo users and role grants, for running the shell without a backend.
    pub fn with_demo_data() -> Self {
        let client = Self::new();
        {
            let mut collections = client.write();
            for (collection, record) in seed::demo_records() {
                collections.entry(collection).or_default().push(record);
            }
        }
        client
    }

    /// Snapshot of every record in a collection, in insertion order.
    pub fn records(&self, collection: Collection) -> Vec<Record> {
        self.read().get(&collection).cloned().unwrap_or_default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Collection, Vec<Record>>> {
        self.collections
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Collection, Vec<Record>>> {
        self.collections
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn record_id(record: &Record) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

fn as_instant(value: &Value) -> Option<DateTime<Utc>> {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Some(l), Some(r)) = (left.as_f64(), right.as_f64()) {
        return l.partial_cmp(&r);
    }
    if let (Some(l), Some(r)) = (as_instant(left), as_instant(right)) {
        return Some(l.cmp(&r));
    }
    match (left, right) {
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
        _ => None,
    }
}

fn matches(record: &Record, query: &ListQuery) -> bool {
    query
        .filter
        .conditions()
        .iter()
        .all(|(field, condition)| match (record.get(field), condition) {
            (Some(actual), Condition::Eq(expected)) => actual == expected,
            (Some(actual), Condition::Gte(bound)) => {
                matches!(
                    compare_values(actual, bound),
                    Some(Ordering::Greater | Ordering::Equal)
                )
            }
            (None, _) => false,
        })
}

#[async_trait]
impl DataClient for MemoryClient {
    async fn list(&self, collection: Collection, query: ListQuery) -> ClientResult<Vec<Record>> {
        let mut found: Vec<Record> = self
            .read()
            .get(&collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|record| matches(record, &query))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order_by {
            found.sort_by(|a, b| {
                let ordering = match (a.get(&order.field), b.get(&order.field)) {
                    (Some(l), Some(r)) => compare_values(l, r).unwrap_or(Ordering::Equal),
                    (Some(_), None) => Ordering::Greater,
                    (None, Some(_)) => Ordering::Less,
                    (None, None) => Ordering::Equal,
                };
                match order.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }

        tracing::debug!("memory list {}: {} match(es)", collection, found.len());
        Ok(found)
    }

    async fn create(&self, collection: Collection, record: Record) -> ClientResult<Record> {
        let id = record_id(&record).ok_or(ClientError::MissingId)?.to_string();
        let mut collections = self.write();
        let records = collections.entry(collection).or_default();
        if records.iter().any(|r| record_id(r) == Some(id.as_str())) {
            return Err(ClientError::Conflict { collection, id });
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Record,
    ) -> ClientResult<Record> {
        let mut collections = self.write();
        let record = collections
            .get_mut(&collection)
            .and_then(|records| records.iter_mut().find(|r| record_id(r) == Some(id)))
            .ok_or_else(|| ClientError::NotFound {
                collection,
                id: id.to_string(),
            })?;

        for (field, value) in fields {
            if field != "id" {
                record.insert(field, value);
            }
        }
        Ok(record.clone())
    }

    async fn delete(&self, collection: Collection, id: &str) -> ClientResult<()> {
        let mut collections = self.write();
        let records = collections.entry(collection).or_default();
        let before = records.len();
        records.retain(|r| record_id(r) != Some(id));
        if records.len() == before {
            return Err(ClientError::NotFound {
                collection,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Filter;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn gte_compares_timestamps_as_instants() {
        let client = MemoryClient::new();
        client
            .create(
                Collection::UserSessions,
                record(json!({ "id": "s1", "token": "t", "expiresAt": "2026-10-19T10:00:00Z" })),
            )
            .await
            .unwrap();

        // Fractional seconds would sort before 'Z' as plain strings.
        let live = client
            .list(
                Collection::UserSessions,
                ListQuery::filter(Filter::new().gte("expiresAt", "2026-10-19T09:59:59.500Z")),
            )
            .await
            .unwrap();
        assert_eq!(live.len(), 1);

        let expired = client
            .list(
                Collection::UserSessions,
                ListQuery::filter(Filter::new().gte("expiresAt", "2026-10-19T10:00:00.001Z")),
            )
            .await
            .unwrap();
        assert!(expired.is_empty());
    }

    #[tokio::test]
    async fn equality_requires_every_condition() {
        let client = MemoryClient::new();
        for (id, active) in [("u1", true), ("u2", false)] {
            client
                .create(
                    Collection::Users,
                    record(json!({ "id": id, "email": "a@company.com", "isActive": active })),
                )
                .await
                .unwrap();
        }

        let found = client
            .list(
                Collection::Users,
                ListQuery::filter(
                    Filter::new()
                        .eq("email", "a@company.com")
                        .eq("isActive", true),
                ),
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["id"], json!("u1"));
    }

    #[tokio::test]
    async fn orders_descending() {
        let client = MemoryClient::new();
        for (id, created) in [
            ("u1", "2026-01-01T00:00:00Z"),
            ("u2", "2026-03-01T00:00:00Z"),
            ("u3", "2026-02-01T00:00:00Z"),
        ] {
            client
                .create(Collection::Users, record(json!({ "id": id, "createdAt": created })))
                .await
                .unwrap();
        }

        let ids: Vec<Value> = client
            .list(
                Collection::Users,
                ListQuery::default().order_by("createdAt", Direction::Desc),
            )
            .await
            .unwrap()
            .into_iter()
            .map(|r| r["id"].clone())
            .collect();
        assert_eq!(ids, vec![json!("u2"), json!("u3"), json!("u1")]);
    }

    #[tokio::test]
    async fn update_merges_and_delete_removes() {
        let client = MemoryClient::new();
        client
            .create(
                Collection::Users,
                record(json!({ "id": "u1", "firstName": "Ada", "phone": "1" })),
            )
            .await
            .unwrap();

        let merged = client
            .update(Collection::Users, "u1", record(json!({ "phone": "2", "id": "other" })))
            .await
            .unwrap();
        assert_eq!(merged["firstName"], json!("Ada"));
        assert_eq!(merged["phone"], json!("2"));
        assert_eq!(merged["id"], json!("u1"));

        client.delete(Collection::Users, "u1").await.unwrap();
        assert!(matches!(
            client.delete(Collection::Users, "u1").await,
            Err(ClientError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn create_rejects_duplicates_and_missing_ids() {
        let client = MemoryClient::new();
        client
            .create(Collection::AuditLogs, record(json!({ "id": "a1" })))
            .await
            .unwrap();
        assert!(matches!(
            client
                .create(Collection::AuditLogs, record(json!({ "id": "a1" })))
                .await,
            Err(ClientError::Conflict { .. })
        ));
        assert!(matches!(
            client
                .create(Collection::AuditLogs, record(json!({ "action": "login" })))
                .await,
            Err(ClientError::MissingId)
        ));
    }
}
