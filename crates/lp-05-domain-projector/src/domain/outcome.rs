/// Result of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionOutcome {
    /// The store changed.
    Applied,
    /// The event was valid but changed nothing.
    NoOp { reason: NoOpReason },
}

impl ProjectionOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// Profile already registered with an external id.
    ProfileExists,
    /// Ordinary mint; the matching registration event creates the profile.
    NotAdminMint,
    /// Revoked flag already had the delivered value.
    RevocationUnchanged,
    /// Purchase id already has a receipt.
    ReceiptExists,
}

impl NoOpReason {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProfileExists => "profile_exists",
            Self::NotAdminMint => "not_admin_mint",
            Self::RevocationUnchanged => "revocation_unchanged",
            Self::ReceiptExists => "receipt_exists",
        }
    }
}
