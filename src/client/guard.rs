use crate::database::models::user::Role;

/// Where session resolution currently stands, as seen by the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Resolving,
    Unauthenticated,
    Authenticated(Role),
}

/// What the hosting shell should do with the current view. The guard never
/// navigates itself; `RedirectToLogin` / `RedirectToHome` are commands for
/// the shell to interpret, and repeating them is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving; render nothing consequential.
    Loading,
    Authorized,
    RedirectToLogin,
    /// Authenticated but the role requirement failed; go to the default
    /// authenticated view.
    RedirectToHome,
}

/// Advisory route gate over the resolved session. These are UX gates only;
/// privileged server operations re-check the role themselves.
///
/// Per guard instance: Resolving → {Authorized, RedirectToLogin,
/// RedirectToHome}. A session change (e.g. logout) restarts resolution by
/// feeding `Resolving` again.
#[derive(Debug, Clone, Copy)]
pub struct RouteGuard {
    session: SessionState,
}

impl RouteGuard {
    pub fn new(session: SessionState) -> Self {
        Self { session }
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    /// Replace the observed session state (resolution completed, logout, ...).
    pub fn observe(&mut self, session: SessionState) {
        self.session = session;
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.session, SessionState::Authenticated(_))
    }

    pub fn has_role(&self, expected: Role) -> bool {
        matches!(self.session, SessionState::Authenticated(role) if role == expected)
    }

    pub fn has_any_role(&self, expected: &[Role]) -> bool {
        matches!(self.session, SessionState::Authenticated(role) if expected.contains(&role))
    }

    /// Gate that only requires an authenticated session.
    pub fn require_authenticated(&self) -> GuardDecision {
        match self.session {
            SessionState::Resolving => GuardDecision::Loading,
            SessionState::Unauthenticated => GuardDecision::RedirectToLogin,
            SessionState::Authenticated(_) => GuardDecision::Authorized,
        }
    }

    /// Gate on one exact role.
    pub fn require_role(&self, expected: Role) -> GuardDecision {
        match self.session {
            SessionState::Resolving => GuardDecision::Loading,
            SessionState::Unauthenticated => GuardDecision::RedirectToLogin,
            SessionState::Authenticated(role) if role == expected => GuardDecision::Authorized,
            SessionState::Authenticated(_) => GuardDecision::RedirectToHome,
        }
    }

    /// Gate on membership in a role set.
    pub fn require_any_role(&self, expected: &[Role]) -> GuardDecision {
        match self.session {
            SessionState::Resolving => GuardDecision::Loading,
            SessionState::Unauthenticated => GuardDecision::RedirectToLogin,
            SessionState::Authenticated(role) if expected.contains(&role) => {
                GuardDecision::Authorized
            }
            SessionState::Authenticated(_) => GuardDecision::RedirectToHome,
        }
    }
}
