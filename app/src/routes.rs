//! Routing and route guards.

use eventos_core::types::EventId;
use eventos_core::{Role, User};
use std::fmt;

/// Every navigable location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Login form
    Login,
    /// Registration form
    Register,
    /// Role-specific landing page
    Dashboard,
    /// Organizer's own events
    MyEvents,
    /// Participant's own enrollments
    MyEnrollments,
    /// Enrollments of one of the organizer's events
    EventEnrollments(EventId),
    /// Profile form
    Profile,
}

impl Route {
    /// Parse a path. Unknown paths, and `/`, land on the dashboard.
    ///
    /// `/event-enrollments/{id}` is accepted as an alias of
    /// `/events/{id}/enrollments`.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["my-events"] => Self::MyEvents,
            ["my-enrollments"] => Self::MyEnrollments,
            ["profile"] => Self::Profile,
            ["events", id, "enrollments"] | ["event-enrollments", id] => id
                .parse()
                .map_or(Self::Dashboard, Self::EventEnrollments),
            _ => Self::Dashboard,
        }
    }

    /// Canonical path.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::MyEvents => "/my-events".to_string(),
            Self::MyEnrollments => "/my-enrollments".to_string(),
            Self::EventEnrollments(id) => format!("/events/{id}/enrollments"),
            Self::Profile => "/profile".to_string(),
        }
    }

    /// Whether the route is only for visitors without a session.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// Role the route is restricted to, if any.
    #[must_use]
    pub const fn required_role(&self) -> Option<Role> {
        match self {
            Self::MyEvents | Self::EventEnrollments(_) => Some(Role::Organizer),
            Self::MyEnrollments => Some(Role::Participant),
            Self::Login | Self::Register | Self::Dashboard | Self::Profile => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// What a route renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Login form
    Login,
    /// Registration form
    Register,
    /// Participant dashboard: the event catalog
    Catalog,
    /// Organizer dashboard and `/my-events`
    OrganizerEvents,
    /// Participant enrollment list
    MyEnrollments,
    /// Organizer enrollment list for one event
    EventEnrollments(EventId),
    /// Profile form
    Profile,
}

/// Outcome of the route guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Show this screen
    Render(Screen),
    /// Navigate elsewhere first
    Redirect(Route),
}

/// Apply the guards to `route` for the current identity.
///
/// - protected route without identity → `/login`
/// - `/login` or `/register` with identity → `/dashboard`
/// - role-restricted route with the wrong role → `/dashboard`
#[must_use]
pub fn resolve(route: Route, identity: Option<&User>) -> RouteDecision {
    let Some(user) = identity else {
        return match route {
            Route::Login => RouteDecision::Render(Screen::Login),
            Route::Register => RouteDecision::Render(Screen::Register),
            _ => RouteDecision::Redirect(Route::Login),
        };
    };

    if route.is_public() {
        return RouteDecision::Redirect(Route::Dashboard);
    }

    if route.required_role().is_some_and(|role| role != user.role) {
        tracing::debug!(route = %route, role = %user.role, "Route not available for role");
        return RouteDecision::Redirect(Route::Dashboard);
    }

    let screen = match route {
        Route::Dashboard => match user.role {
            Role::Participant => Screen::Catalog,
            Role::Organizer => Screen::OrganizerEvents,
        },
        Route::MyEvents => Screen::OrganizerEvents,
        Route::MyEnrollments => Screen::MyEnrollments,
        Route::EventEnrollments(id) => Screen::EventEnrollments(id),
        Route::Profile => Screen::Profile,
        // Public routes returned above
        Route::Login | Route::Register => Screen::Catalog,
    };
    RouteDecision::Render(screen)
}

/// Follow redirects until a screen renders.
#[must_use]
pub fn navigate(path: &str, identity: Option<&User>) -> (Route, Screen) {
    let mut route = Route::parse(path);
    // Each redirect lands on /login or /dashboard, which always render.
    for _ in 0..3 {
        match resolve(route, identity) {
            RouteDecision::Render(screen) => return (route, screen),
            RouteDecision::Redirect(next) => route = next,
        }
    }
    (Route::Login, Screen::Login)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventos_core::types::UserId;

    fn user(role: Role) -> User {
        User {
            id: UserId::new(),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            role,
            created_at: None,
        }
    }

    #[test]
    fn parses_canonical_and_legacy_enrollment_paths() {
        let id = EventId::new();
        let canonical = Route::parse(&format!("/events/{id}/enrollments"));
        let legacy = Route::parse(&format!("/event-enrollments/{id}"));

        assert_eq!(canonical, Route::EventEnrollments(id));
        assert_eq!(legacy, canonical);
        assert_eq!(legacy.path(), format!("/events/{id}/enrollments"));
    }

    #[test]
    fn unknown_paths_land_on_dashboard() {
        assert_eq!(Route::parse("/"), Route::Dashboard);
        assert_eq!(Route::parse("/nowhere"), Route::Dashboard);
        assert_eq!(Route::parse("/events/not-a-uuid/enrollments"), Route::Dashboard);
        assert_eq!(Route::parse("/profile/?tab=security"), Route::Profile);
    }

    #[test]
    fn anonymous_visitors_go_to_login() {
        assert_eq!(
            resolve(Route::MyEnrollments, None),
            RouteDecision::Redirect(Route::Login)
        );
        assert_eq!(resolve(Route::Register, None), RouteDecision::Render(Screen::Register));
        assert_eq!(navigate("/dashboard", None), (Route::Login, Screen::Login));
    }

    #[test]
    fn logged_in_users_skip_login() {
        let participant = user(Role::Participant);
        assert_eq!(
            resolve(Route::Login, Some(&participant)),
            RouteDecision::Redirect(Route::Dashboard)
        );
        assert_eq!(
            navigate("/register", Some(&participant)),
            (Route::Dashboard, Screen::Catalog)
        );
    }

    #[test]
    fn wrong_role_goes_to_dashboard() {
        let participant = user(Role::Participant);
        let organizer = user(Role::Organizer);

        assert_eq!(
            resolve(Route::MyEvents, Some(&participant)),
            RouteDecision::Redirect(Route::Dashboard)
        );
        assert_eq!(
            resolve(Route::MyEnrollments, Some(&organizer)),
            RouteDecision::Redirect(Route::Dashboard)
        );
        assert_eq!(
            navigate(&format!("/event-enrollments/{}", EventId::new()), Some(&participant)).1,
            Screen::Catalog
        );
    }

    #[test]
    fn dashboard_depends_on_role() {
        assert_eq!(
            resolve(Route::Dashboard, Some(&user(Role::Organizer))),
            RouteDecision::Render(Screen::OrganizerEvents)
        );
        assert_eq!(
            resolve(Route::Dashboard, Some(&user(Role::Participant))),
            RouteDecision::Render(Screen::Catalog)
        );
    }
}
