use viewconf_types::UserId;

/// Per-call ambient state the framework would carry in its transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Acting user; `None` acts on default-for-all-users customizations.
    pub user: Option<UserId>,
    /// Bypass customizations and return the stored default view.
    pub avoid_custom_view: bool,
}

impl RequestContext {
    pub fn new(user: Option<UserId>) -> Self {
        Self {
            user,
            avoid_custom_view: false,
        }
    }

    pub fn avoiding_custom_view(self) -> Self {
        Self {
            avoid_custom_view: true,
            ..self
        }
    }
}
