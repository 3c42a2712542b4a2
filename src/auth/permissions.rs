use std::collections::{BTreeMap, BTreeSet};

use crate::client::{Collection, DataClient, Filter, ListQuery, ClientResult, list_as};
use crate::models::{Permission, Role, RolePermissionRecord};

/// Verbs a role holds, per module. Loaded once per login or restore and never
/// patched afterwards.
///
/// Rows naming the same module are merged, so a verb granted by any row
/// counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    grants: BTreeMap<String, BTreeSet<String>>,
}

impl PermissionSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = RolePermissionRecord>) -> Self {
        let mut grants: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for record in records {
            grants
                .entry(record.module)
                .or_default()
                .extend(record.permissions);
        }
        Self { grants }
    }

    /// The module has at least one verb.
    pub fn can_access(&self, module: &str) -> bool {
        self.grants
            .get(module)
            .is_some_and(|verbs| !verbs.is_empty())
    }

    pub fn has_permission(&self, module: &str, verb: &str) -> bool {
        self.grants
            .get(module)
            .is_some_and(|verbs| verbs.contains(verb))
    }

    pub fn is_empty(&self) -> bool {
        self.grants.values().all(BTreeSet::is_empty)
    }

    pub fn to_permissions(&self) -> Vec<Permission> {
        self.grants
            .iter()
            .map(|(module, verbs)| Permission {
                module: module.clone(),
                permissions: verbs.iter().cloned().collect(),
            })
            .collect()
    }
}

/// Every `rolePermissions` row for `role`. A row whose verbs fail to decode
/// fails the whole fetch.
pub async fn fetch_permissions(client: &dyn DataClient, role: Role) -> ClientResult<PermissionSet> {
    let records: Vec<RolePermissionRecord> = list_as(
        client,
        Collection::RolePermissions,
        ListQuery::filter(Filter::new().eq("role", role.as_str())),
    )
    .await?;
    tracing::debug!("loaded {} permission row(s) for {}", records.len(), role);
    Ok(PermissionSet::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(module: &str, verbs: &[&str]) -> RolePermissionRecord {
        RolePermissionRecord {
            id: format!("rp_{}", module),
            role: Role::Admin,
            module: module.to_string(),
            permissions: verbs.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[test]
    fn admin_users_scenario() {
        let set = PermissionSet::from_records([row("users", &["read", "write"])]);
        assert!(set.can_access("users"));
        assert!(set.has_permission("users", "write"));
        assert!(!set.has_permission("users", "delete"));
        assert!(!set.can_access("billing"));
    }

    #[test]
    fn empty_verb_list_grants_nothing() {
        let set = PermissionSet::from_records([row("reports", &[])]);
        assert!(!set.can_access("reports"));
        assert!(!set.has_permission("reports", "read"));
        assert!(set.is_empty());
    }

    #[test]
    fn duplicate_module_rows_merge() {
        let set = PermissionSet::from_records([row("leads", &["read"]), row("leads", &["write"])]);
        assert!(set.has_permission("leads", "read"));
        assert!(set.has_permission("leads", "write"));
        assert_eq!(
            set.to_permissions(),
            vec![Permission {
                module: "leads".into(),
                permissions: vec!["read".into(), "write".into()],
            }]
        );
    }

    #[test]
    fn any_held_verb_implies_access() {
        let set = PermissionSet::from_records([
            row("contacts", &["write"]),
            row("contracts", &["read"]),
            row("billing", &[]),
        ]);
        for module in ["contacts", "contracts", "billing", "unknown"] {
            for verb in ["read", "write", "export"] {
                if set.has_permission(module, verb) {
                    assert!(set.can_access(module), "{verb} on {module} without access");
                }
            }
        }
    }
}
