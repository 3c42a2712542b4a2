use serde::Deserialize;

use crate::models::{Role, User};

/// Trimmed, lower-cased form under which emails are stored.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `local@domain` with both parts present and no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    !email.chars().any(char::is_whitespace)
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    pub search: Option<String>,
    /// A role key, or `all`.
    pub role: Option<String>,
}

impl UserQuery {
    pub fn role_filter(&self) -> Result<Option<Role>, String> {
        match self.role.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(role) => role
                .parse::<Role>()
                .map(Some)
                .map_err(|_| format!("unknown role: {}", role)),
        }
    }

    /// Case-insensitive match over name, email and department.
    pub fn matches(&self, user: &User) -> bool {
        let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return true;
        };
        let term = term.to_lowercase();
        [
            Some(user.first_name.as_str()),
            Some(user.last_name.as_str()),
            Some(user.email.as_str()),
            user.department.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !is_valid_email(&normalize_email(&self.email)) {
            return Err("A valid email is required");
        }
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err("First and last name are required");
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u1".into(),
            email: "jane.doe@crm.com".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            role: Role::Finance,
            department: Some("Accounts Receivable".into()),
            phone: None,
            avatar_url: None,
            is_active: true,
            last_login: None,
        }
    }

    #[test]
    fn search_covers_names_email_and_department() {
        for term in ["jane", "DOE", "crm.com", "receivable", "  "] {
            let query = UserQuery {
                search: Some(term.into()),
                role: None,
            };
            assert!(query.matches(&user()), "{term}");
        }
        let query = UserQuery {
            search: Some("sales".into()),
            role: None,
        };
        assert!(!query.matches(&user()));
    }

    fn create(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.into(),
            first_name: "New".into(),
            last_name: "Hire".into(),
            role: Role::SalesTeam,
            department: None,
            phone: None,
            password: None,
            is_active: None,
        }
    }

    #[test]
    fn email_is_checked_after_trimming() {
        assert!(create("  New.Hire@Company.com ").validate().is_ok());
        for email in [" @ ", "@company.com", "new.hire@", "new hire@company.com", ""] {
            assert!(create(email).validate().is_err(), "{email:?}");
        }
        assert_eq!(normalize_email(" New.Hire@Company.COM "), "new.hire@company.com");
    }

    #[test]
    fn role_all_means_no_filter() {
        let query = UserQuery {
            search: None,
            role: Some("all".into()),
        };
        assert_eq!(query.role_filter(), Ok(None));

        let query = UserQuery {
            search: None,
            role: Some("finance".into()),
        };
        assert_eq!(query.role_filter(), Ok(Some(Role::Finance)));

        let query = UserQuery {
            search: None,
            role: Some("janitor".into()),
        };
        assert!(query.role_filter().is_err());
    }
}
