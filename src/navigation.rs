// Shell routes and sidebar entries, gated by the session's permission set.

use serde::Serialize;

use crate::auth::AuthSession;
use crate::auth::guard::DEFAULT_ROUTE_PERMISSION;
use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavItem {
    pub name: &'static str,
    pub href: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_module: Option<&'static str>,
    pub admin_only: bool,
}

const fn item(name: &'static str, href: &'static str, module: Option<&'static str>) -> NavItem {
    NavItem {
        name,
        href,
        required_module: module,
        admin_only: false,
    }
}

pub const NAVIGATION: &[NavItem] = &[
    item("Dashboard", "/dashboard", None),
    item("Contacts", "/contacts", Some("contacts")),
    item("Leads", "/leads", Some("leads")),
    item("Team Kanban", "/team-kanban", Some("leads")),
    item("Opportunities", "/opportunities", Some("opportunities")),
    item("Companies", "/companies", None),
    item("Tasks", "/tasks", None),
    item("Calendar", "/calendar", None),
    item("Contracts", "/contracts", Some("contracts")),
    item("Reports", "/reports", Some("reports")),
    item("Marketing", "/marketing", None),
    item("Billing", "/billing", Some("billing")),
    item("Integrations", "/integrations", Some("integrations")),
    NavItem {
        name: "Users",
        href: "/users",
        required_module: Some("users"),
        admin_only: true,
    },
    item("Settings", "/settings", None),
];

/// Sidebar entries the current session may see.
///
/// Entries without a module are always listed; module entries need
/// `can_access`, and admin-only entries additionally need the admin role.
pub fn visible_items(session: &AuthSession) -> Vec<&'static NavItem> {
    let is_admin = session
        .current_user()
        .is_some_and(|user| user.role == Role::Admin);

    NAVIGATION
        .iter()
        .filter(|item| match item.required_module {
            None => true,
            Some(module) => session.can_access(module) && (!item.admin_only || is_admin),
        })
        .collect()
}

/// A page of the shell and the grant it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShellRoute {
    pub path: &'static str,
    pub title: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<&'static str>,
    pub permission: &'static str,
}

const fn route(path: &'static str, title: &'static str, module: Option<&'static str>) -> ShellRoute {
    ShellRoute {
        path,
        title,
        module,
        permission: DEFAULT_ROUTE_PERMISSION,
    }
}

pub const SHELL_ROUTES: &[ShellRoute] = &[
    route("/dashboard", "Dashboard", None),
    route("/contacts", "Contacts", Some("contacts")),
    route("/leads", "Leads", Some("leads")),
    route("/team-kanban", "Team Kanban", Some("leads")),
    route("/opportunities", "Opportunities", Some("opportunities")),
    route("/contracts", "Contracts", Some("contracts")),
    route("/integrations", "Integrations", Some("integrations")),
    route("/users", "Users", Some("users")),
    route("/companies", "Companies", None),
    route("/tasks", "Tasks", None),
    route("/calendar", "Calendar", None),
    route("/reports", "Reports", Some("reports")),
    route("/marketing", "Marketing", None),
    route("/billing", "Billing", Some("billing")),
    route("/settings", "Settings", None),
];

/// Shell route owning `path`, matching the route itself or anything below it.
pub fn route_for_path(path: &str) -> Option<&'static ShellRoute> {
    SHELL_ROUTES.iter().find(|route| {
        path == route.path
            || path
                .strip_prefix(route.path)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}
