use dioxus::prelude::*;
use shared_types::{Role, Session, SessionStore};

/// Process-wide session: who is signed in, and whether that has been
/// established since page load.
///
/// Written by the route guard (hydration), the login page and sign-out;
/// read everywhere else through [`use_session`] and [`use_role`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionState {
    current: Signal<Option<Session>>,
    hydrated: Signal<bool>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            current: Signal::new(None),
            hydrated: Signal::new(false),
        }
    }

    /// Record the session restored from the server. Only the first call has
    /// an effect; later changes go through `sign_in` / `sign_out`.
    pub fn hydrate(&mut self, session: Option<Session>) {
        if *self.hydrated.peek() {
            return;
        }
        tracing::debug!(signed_in = session.is_some(), "session restored");
        self.current.set(session);
        self.hydrated.set(true);
    }

    pub fn sign_in(&mut self, session: Session) {
        tracing::info!(user_id = session.user_id, role = %session.role, "session started");
        self.current.set(Some(session));
        self.hydrated.set(true);
    }

    pub fn sign_out(&mut self) {
        if let Some(previous) = self.current.take() {
            tracing::info!(user_id = previous.user_id, "session ended");
        }
    }

    pub fn display_name(&self) -> Option<String> {
        self.current
            .read()
            .as_ref()
            .map(|session| session.display_name.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.current.read().as_ref().and_then(Session::role)
    }
}

impl SessionStore for SessionState {
    fn session(&self) -> Option<Session> {
        self.current.cloned()
    }

    fn is_hydrated(&self) -> bool {
        *self.hydrated.read()
    }
}

pub fn use_session() -> SessionState {
    use_context::<SessionState>()
}

/// Role of the signed-in user. `None` while signed out, still loading, or
/// when the account holds a tag the console does not know.
pub fn use_role() -> Option<Role> {
    use_session().role()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> Session {
        Session {
            user_id: 7,
            username: "agent".into(),
            display_name: "Alex Agent".into(),
            email: "agent@policydesk.test".into(),
            role: "agent".into(),
        }
    }

    /// Runs `steps` once inside a component scope and renders what it returns.
    fn run_in_scope(steps: fn() -> String) -> String {
        let mut dom = VirtualDom::new_with_props(
            |steps: fn() -> String| {
                let out = use_hook(steps);
                rsx! { "{out}" }
            },
            steps,
        );
        dom.rebuild_in_place();
        dioxus_ssr::render(&dom)
    }

    #[test]
    fn starts_unhydrated_and_signed_out() {
        let out = run_in_scope(|| {
            let state = SessionState::new();
            format!("{}:{}", state.is_hydrated(), state.session().is_none())
        });
        assert_eq!(out, "false:true");
    }

    #[test]
    fn only_the_first_hydration_counts() {
        let out = run_in_scope(|| {
            let mut state = SessionState::new();
            state.hydrate(Some(agent()));
            state.hydrate(None);
            format!("{:?}", state.role())
        });
        assert_eq!(out, "Some(Agent)");
    }

    #[test]
    fn sign_out_stays_hydrated() {
        let out = run_in_scope(|| {
            let mut state = SessionState::new();
            state.sign_in(agent());
            state.sign_out();
            format!("{}:{}", state.is_hydrated(), state.session().is_none())
        });
        assert_eq!(out, "true:true");
    }

    #[test]
    fn unknown_role_tag_has_no_role() {
        let out = run_in_scope(|| {
            let mut state = SessionState::new();
            state.hydrate(Some(Session {
                role: "client".into(),
                ..agent()
            }));
            format!("{:?}", state.role())
        });
        assert_eq!(out, "None");
    }
}
