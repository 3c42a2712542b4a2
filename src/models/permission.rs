use serde::{Deserialize, Deserializer, Serialize};

use super::Role;

/// A row of the `rolePermissions` collection.
///
/// The backend stores `permissions` as a JSON-encoded string
/// (`"[\"read\",\"write\"]"`); a plain array is accepted as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissionRecord {
    pub id: String,
    pub role: Role,
    pub module: String,
    #[serde(deserialize_with = "decode_verbs", serialize_with = "encode_verbs")]
    pub permissions: Vec<String>,
}

/// Verbs granted on one module, as exposed to the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Permission {
    pub module: String,
    pub permissions: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredVerbs {
    Encoded(String),
    List(Vec<String>),
}

fn decode_verbs<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match StoredVerbs::deserialize(deserializer)? {
        StoredVerbs::Encoded(raw) => serde_json::from_str(&raw).map_err(serde::de::Error::custom),
        StoredVerbs::List(verbs) => Ok(verbs),
    }
}

fn encode_verbs<S>(verbs: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let raw = serde_json::to_string(verbs).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_json_encoded_verbs() {
        let row = json!({
            "id": "rp_1",
            "role": "admin",
            "module": "users",
            "permissions": "[\"read\",\"write\"]"
        });
        let record: RolePermissionRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.permissions, vec!["read", "write"]);
    }

    #[test]
    fn accepts_plain_arrays() {
        let row = json!({
            "id": "rp_2",
            "role": "sales",
            "module": "leads",
            "permissions": ["read"]
        });
        let record: RolePermissionRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.permissions, vec!["read"]);
    }

    #[test]
    fn rejects_garbled_encoding() {
        let row = json!({
            "id": "rp_3",
            "role": "sales",
            "module": "leads",
            "permissions": "read,write"
        });
        assert!(serde_json::from_value::<RolePermissionRecord>(row).is_err());
    }

    #[test]
    fn writes_verbs_back_encoded() {
        let record = RolePermissionRecord {
            id: "rp_4".into(),
            role: Role::Finance,
            module: "billing".into(),
            permissions: vec!["read".into()],
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["permissions"], json!("[\"read\"]"));
    }
}
