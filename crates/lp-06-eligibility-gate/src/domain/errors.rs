use shared_types::{ContentId, StoreError};
use thiserror::Error;

/// Typed rejection of a purchase-identifier request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EligibilityError {
    #[error("listing {0} does not exist")]
    NotFound(ContentId),

    #[error("listing {0} is not available for purchase")]
    Unavailable(ContentId),

    #[error("sellers cannot buy their own listing")]
    SelfPurchaseForbidden,

    #[error("the seller of this listing has been revoked")]
    SellerRevoked,

    /// Not a rejection: the store could not answer.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl EligibilityError {
    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Unavailable(_) => "UNAVAILABLE",
            Self::SelfPurchaseForbidden => "SELF_PURCHASE_FORBIDDEN",
            Self::SellerRevoked => "SELLER_REVOKED",
            Self::Storage(_) => "STORAGE_UNAVAILABLE",
        }
    }
}
