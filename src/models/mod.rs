mod audit;
mod permission;
mod session;
pub mod user;

pub use audit::{AuditAction, AuditLogRecord};
pub use permission::{Permission, RolePermissionRecord};
pub use session::SessionRecord;
pub use user::{Role, UnknownRole, User, UserRecord};
