//! Route guarding for front ends built on this client.

use crate::config::{ADMIN_ROUTE, DASHBOARD_ROUTE, LOGIN_ROUTE};
use crate::models::User;

/// What a route needs from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteRequirement {
    /// Any signed-in user.
    #[default]
    Authenticated,
    /// A signed-in user with the admin role.
    Admin,
}

impl RouteRequirement {
    /// Requirement of a front-end route: everything under `/admin` needs
    /// the admin role.
    pub fn for_path(path: &str) -> Self {
        let under_admin = path
            .strip_prefix(ADMIN_ROUTE)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
        if under_admin {
            RouteRequirement::Admin
        } else {
            RouteRequirement::Authenticated
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(&'static str),
}

/// Decide whether `user` may enter a route with `requirement`.
///
/// Unauthenticated callers go to the login page; non-admins asking for an
/// admin route go to the dashboard.
pub fn check(user: Option<&User>, requirement: RouteRequirement) -> RouteDecision {
    match (user, requirement) {
        (None, _) => RouteDecision::Redirect(LOGIN_ROUTE),
        (Some(user), RouteRequirement::Admin) if !user.is_admin() => {
            RouteDecision::Redirect(DASHBOARD_ROUTE)
        }
        (Some(_), _) => RouteDecision::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn user(role: UserRole) -> User {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "email": "a@b.com",
            "full_name": null,
            "role": role.to_string(),
            "is_active": true,
            "is_verified": true,
            "created_at": "2024-01-01T00:00:00",
            "updated_at": "2024-01-01T00:00:00"
        }))
        .unwrap()
    }

    #[test]
    fn test_requirement_for_path() {
        assert_eq!(RouteRequirement::for_path("/admin"), RouteRequirement::Admin);
        assert_eq!(RouteRequirement::for_path("/admin/users"), RouteRequirement::Admin);
        assert_eq!(RouteRequirement::for_path("/administrivia"), RouteRequirement::Authenticated);
        assert_eq!(RouteRequirement::for_path("/dashboard"), RouteRequirement::Authenticated);
    }

    #[test]
    fn test_anonymous_goes_to_login() {
        assert_eq!(check(None, RouteRequirement::Authenticated), RouteDecision::Redirect("/login"));
        assert_eq!(check(None, RouteRequirement::Admin), RouteDecision::Redirect("/login"));
    }

    #[test]
    fn test_admin_routes() {
        let member = user(UserRole::User);
        let admin = user(UserRole::Admin);

        assert_eq!(check(Some(&member), RouteRequirement::Authenticated), RouteDecision::Allow);
        assert_eq!(
            check(Some(&member), RouteRequirement::Admin),
            RouteDecision::Redirect("/dashboard")
        );
        assert_eq!(check(Some(&admin), RouteRequirement::Admin), RouteDecision::Allow);
    }
}
