//! Demo tenant used by `DATA_BACKEND=memory`.
//!
//! The accounts match the demo credential table in `auth::credentials`.

use serde_json::{Value, json};

use super::{Collection, Record};
use crate::models::Role;

pub const DEMO_CREATED_AT: &str = "2026-01-05T09:00:00Z";

const READ: &[&str] = &["read"];
const READ_WRITE: &[&str] = &["read", "write"];

pub const DEMO_USERS: &[(&str, &str, &str, Role)] = &[
    ("admin@company.com", "System", "Admin", Role::Admin),
    ("leadgen@company.com", "Lena", "Generation", Role::LeadGeneration),
    ("presales@company.com", "Priya", "Presales", Role::PresalesTeam),
    ("sales@company.com", "Sam", "Sales", Role::SalesTeam),
    ("implementation@company.com", "Ivan", "Implementation", Role::Implementation),
    ("finance@company.com", "Fiona", "Finance", Role::Finance),
    ("data@company.com", "Dana", "Data", Role::DataTeam),
];

pub const DEMO_GRANTS: &[(Role, &str, &[&str])] = &[
    (Role::Admin, "contacts", READ_WRITE),
    (Role::Admin, "leads", READ_WRITE),
    (Role::Admin, "opportunities", READ_WRITE),
    (Role::Admin, "contracts", READ_WRITE),
    (Role::Admin, "integrations", READ_WRITE),
    (Role::Admin, "users", READ_WRITE),
    (Role::Admin, "billing", READ_WRITE),
    (Role::Admin, "reports", READ_WRITE),
    (Role::LeadGeneration, "contacts", READ_WRITE),
    (Role::LeadGeneration, "leads", READ_WRITE),
    (Role::PreSales, "contacts", READ),
    (Role::PreSales, "leads", READ_WRITE),
    (Role::PreSales, "opportunities", READ_WRITE),
    (Role::Sales, "contacts", READ),
    (Role::Sales, "leads", READ),
    (Role::Sales, "opportunities", READ_WRITE),
    (Role::Sales, "contracts", READ_WRITE),
    (Role::Implementation, "contracts", READ),
    (Role::Implementation, "integrations", READ_WRITE),
    (Role::Finance, "contracts", READ),
    (Role::Finance, "billing", READ_WRITE),
    (Role::Finance, "reports", READ),
    (Role::DataTeam, "contacts", READ_WRITE),
    (Role::DataTeam, "leads", READ_WRITE),
    (Role::DataTeam, "reports", READ),
    (Role::PresalesTeam, "leads", READ_WRITE),
    (Role::PresalesTeam, "opportunities", READ),
    (Role::SalesTeam, "leads", READ),
    (Role::SalesTeam, "opportunities", READ_WRITE),
    (Role::SalesTeam, "contracts", READ_WRITE),
];

fn object(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

pub fn demo_records() -> Vec<(Collection, Record)> {
    let users = DEMO_USERS
        .iter()
        .enumerate()
        .map(|(n, (email, first_name, last_name, role))| {
            let record = json!({
                "id": format!("user_demo_{}", n + 1),
                "email": email,
                "firstName": first_name,
                "lastName": last_name,
                "role": role.as_str(),
                "isActive": true,
                "createdAt": DEMO_CREATED_AT,
                "updatedAt": DEMO_CREATED_AT,
            });
            (Collection::Users, object(record))
        });

    let grants = DEMO_GRANTS
        .iter()
        .enumerate()
        .map(|(n, (role, module, verbs))| {
            let encoded = serde_json::to_string(verbs).unwrap_or_else(|_| "[]".to_string());
            let record = json!({
                "id": format!("rp_demo_{}", n + 1),
                "role": role.as_str(),
                "module": module,
                "permissions": encoded,
            });
            (Collection::RolePermissions, object(record))
        });

    users.chain(grants).collect()
}
