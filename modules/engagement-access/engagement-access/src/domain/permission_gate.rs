//! Role-gated rendering decisions.
//!
//! Matching is a flat any-intersection of role and scope strings. There is
//! no hierarchy, no wildcard and no deny rule.

use engage_security::constants::TEAM_MEMBER_ROLE;
use engage_security::{RequestContext, RoleSet, Scope};

use super::error::DomainError;

/// Per call site gate policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatePolicy {
    /// Holders of the team-member role pass regardless of the scopes.
    pub allow_team_member_override: bool,
}

impl GatePolicy {
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            allow_team_member_override: false,
        }
    }

    #[must_use]
    pub const fn with_team_member_override() -> Self {
        Self {
            allow_team_member_override: true,
        }
    }
}

/// Grant iff a held role equals a required scope, or the policy lets the
/// team-member role through. An empty scope list grants nothing.
#[must_use]
pub fn can_render(roles: &RoleSet, required: &[Scope], policy: GatePolicy) -> bool {
    if roles.intersects(required) {
        return true;
    }
    policy.allow_team_member_override && roles.contains(TEAM_MEMBER_ROLE)
}

/// Route-level guard.
///
/// # Errors
///
/// `MissingScope` when [`can_render`] denies.
pub fn require(
    ctx: &RequestContext,
    required: &[Scope],
    policy: GatePolicy,
) -> Result<(), DomainError> {
    if can_render(ctx.roles(), required, policy) {
        Ok(())
    } else {
        tracing::debug!(
            user_id = ctx.user_id().unwrap_or_default(),
            required = ?required,
            "access denied"
        );
        Err(DomainError::MissingScope)
    }
}

/// Elements that can render a disabled variant of themselves.
pub trait InjectErrorProps: Sized {
    /// Props merged into the element when access is denied.
    type Props;

    #[must_use]
    fn with_error_props(&self, props: &Self::Props) -> Self;
}

/// What the gate renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gated<E> {
    /// Access granted: the protected element unchanged.
    Granted(E),
    /// Access denied: the caller-supplied fallback.
    Fallback(E),
    /// Access denied: the protected element with error props injected.
    Disabled(E),
    /// Access denied and nothing to show.
    Hidden,
}

impl<E> Gated<E> {
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }

    pub fn into_element(self) -> Option<E> {
        match self {
            Self::Granted(e) | Self::Fallback(e) | Self::Disabled(e) => Some(e),
            Self::Hidden => None,
        }
    }
}

/// Gate around one protected element.
///
/// On deny exactly one mode applies, by precedence: fallback element, then
/// error-prop injection, then nothing.
pub struct PermissionGate<E: InjectErrorProps> {
    scopes: Vec<Scope>,
    policy: GatePolicy,
    fallback: Option<E>,
    error_props: Option<E::Props>,
}

impl<E: InjectErrorProps> PermissionGate<E> {
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scope>,
    {
        Self {
            scopes: scopes.into_iter().map(Into::into).collect(),
            policy: GatePolicy::default(),
            fallback: None,
            error_props: None,
        }
    }

    #[must_use]
    pub fn policy(mut self, policy: GatePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn fallback(mut self, fallback: E) -> Self {
        self.fallback = Some(fallback);
        self
    }

    #[must_use]
    pub fn error_props(mut self, props: E::Props) -> Self {
        self.error_props = Some(props);
        self
    }

    pub fn render(self, roles: &RoleSet, protected: E) -> Gated<E> {
        if can_render(roles, &self.scopes, self.policy) {
            return Gated::Granted(protected);
        }
        if let Some(fallback) = self.fallback {
            return Gated::Fallback(fallback);
        }
        if let Some(props) = &self.error_props {
            return Gated::Disabled(protected.with_error_props(props));
        }
        Gated::Hidden
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Button {
        label: &'static str,
        disabled: bool,
        tooltip: Option<&'static str>,
    }

    impl Button {
        fn new(label: &'static str) -> Self {
            Self {
                label,
                disabled: false,
                tooltip: None,
            }
        }
    }

    impl InjectErrorProps for Button {
        type Props = &'static str;

        fn with_error_props(&self, tooltip: &Self::Props) -> Self {
            Self {
                disabled: true,
                tooltip: Some(*tooltip),
                ..self.clone()
            }
        }
    }

    fn roles(list: &[&str]) -> RoleSet {
        list.iter().copied().collect()
    }

    fn scopes(list: &[&str]) -> Vec<Scope> {
        list.iter().copied().map(Scope::from).collect()
    }

    #[test]
    fn viewer_cannot_render_admin_content() {
        assert!(!can_render(
            &roles(&["VIEWER"]),
            &scopes(&["ADMIN"]),
            GatePolicy::default()
        ));
    }

    #[test]
    fn any_intersection_grants() {
        assert!(can_render(
            &roles(&["ADMIN"]),
            &scopes(&["ADMIN", "VIEWER"]),
            GatePolicy::default()
        ));
    }

    #[test]
    fn team_member_needs_override() {
        let team = roles(&[TEAM_MEMBER_ROLE]);
        let admin = scopes(&["ADMIN"]);
        assert!(!can_render(&team, &admin, GatePolicy::strict()));
        assert!(can_render(
            &team,
            &admin,
            GatePolicy::with_team_member_override()
        ));
    }

    #[test]
    fn empty_scopes_grant_nothing() {
        assert!(!can_render(&roles(&["ADMIN"]), &[], GatePolicy::default()));
    }

    #[test]
    fn require_maps_deny_to_missing_scope() {
        let ctx = RequestContext::builder().add_role("VIEWER").build();
        assert!(require(&ctx, &scopes(&["VIEWER"]), GatePolicy::default()).is_ok());
        assert!(matches!(
            require(&ctx, &scopes(&["ADMIN"]), GatePolicy::default()),
            Err(DomainError::MissingScope)
        ));
    }

    #[test]
    fn session_context_is_checked_under_the_given_policy() {
        let ctx = RequestContext::builder()
            .user_id("u-1")
            .add_role(TEAM_MEMBER_ROLE)
            .build();
        let admin = scopes(&["ADMIN"]);

        assert!(matches!(
            require(&ctx, &admin, GatePolicy::strict()),
            Err(DomainError::MissingScope)
        ));
        assert!(require(&ctx, &admin, GatePolicy::with_team_member_override()).is_ok());
        assert_eq!(
            can_render(ctx.roles(), &admin, GatePolicy::strict()),
            require(&ctx, &admin, GatePolicy::strict()).is_ok()
        );
    }

    #[test]
    fn granted_renders_protected_unchanged() {
        let gate = PermissionGate::new(["ADMIN"]).fallback(Button::new("no access"));
        let out = gate.render(&roles(&["ADMIN"]), Button::new("delete"));
        assert_eq!(out, Gated::Granted(Button::new("delete")));
    }

    #[test]
    fn fallback_wins_over_error_props() {
        let gate = PermissionGate::new(["ADMIN"])
            .fallback(Button::new("no access"))
            .error_props("admins only");
        let out = gate.render(&roles(&["VIEWER"]), Button::new("delete"));
        assert_eq!(out, Gated::Fallback(Button::new("no access")));
    }

    #[test]
    fn error_props_disable_protected_element() {
        let gate = PermissionGate::new(["ADMIN"]).error_props("admins only");
        let out = gate.render(&roles(&["VIEWER"]), Button::new("delete"));
        assert_eq!(
            out,
            Gated::Disabled(Button {
                label: "delete",
                disabled: true,
                tooltip: Some("admins only"),
            })
        );
    }

    #[test]
    fn nothing_supplied_hides() {
        let gate: PermissionGate<Button> = PermissionGate::new(["ADMIN"]);
        let out = gate.render(&roles(&["VIEWER"]), Button::new("delete"));
        assert_eq!(out, Gated::Hidden);
        assert!(out.into_element().is_none());
    }
}
