use serde::Serialize;

use super::AuthSession;
use crate::models::Role;

/// Default verb required by a module-gated route.
pub const DEFAULT_ROUTE_PERMISSION: &str = "read";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Session restore or a login is still running.
    Loading,
    RedirectToLogin,
    AccessDenied {
        module: String,
        permission: String,
        role: Role,
    },
    Allow,
}

/// Decide whether the current session may enter a route.
///
/// `module = None` only requires an authenticated user. Otherwise both
/// `can_access(module)` and `has_permission(module, permission)` must hold.
pub fn check_route(session: &AuthSession, module: Option<&str>, permission: &str) -> GuardDecision {
    if session.is_loading() {
        return GuardDecision::Loading;
    }
    let Some(user) = session.current_user() else {
        return GuardDecision::RedirectToLogin;
    };
    let Some(module) = module else {
        return GuardDecision::Allow;
    };

    if session.can_access(module) && session.has_permission(module, permission) {
        GuardDecision::Allow
    } else {
        GuardDecision::AccessDenied {
            module: module.to_string(),
            permission: permission.to_string(),
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::credentials::DemoCredentials;
    use crate::cache::MemoryTokenStore;
    use crate::client::MemoryClient;
    use std::sync::Arc;
    use std::time::Duration;

    fn session() -> AuthSession {
        AuthSession::new(
            Arc::new(MemoryClient::with_demo_data()),
            Arc::new(MemoryTokenStore::new()),
            Arc::new(DemoCredentials::default()),
            Duration::from_secs(3600),
            "guard-tests",
        )
    }

    #[tokio::test]
    async fn loading_before_restore() {
        let session = session();
        assert_eq!(check_route(&session, None, "read"), GuardDecision::Loading);
    }

    #[tokio::test]
    async fn anonymous_is_sent_to_login() {
        let mut session = session();
        session.restore_session().await;
        assert_eq!(
            check_route(&session, Some("contacts"), "read"),
            GuardDecision::RedirectToLogin
        );
        assert_eq!(check_route(&session, None, "read"), GuardDecision::RedirectToLogin);
    }

    #[tokio::test]
    async fn module_routes_follow_the_role() {
        let mut session = session();
        assert!(session.login("presales@company.com", "presales123").await.success);

        assert_eq!(check_route(&session, None, "read"), GuardDecision::Allow);
        assert_eq!(check_route(&session, Some("leads"), "read"), GuardDecision::Allow);
        assert_eq!(
            check_route(&session, Some("opportunities"), "write"),
            GuardDecision::AccessDenied {
                module: "opportunities".into(),
                permission: "write".into(),
                role: Role::PresalesTeam,
            }
        );
        assert!(matches!(
            check_route(&session, Some("users"), "read"),
            GuardDecision::AccessDenied { .. }
        ));
    }
}
