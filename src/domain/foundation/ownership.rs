//! Ownership trait for account-owned resources.
//!
//! Every conversation belongs to exactly one account for its whole lifetime.
//! Handlers call [`OwnedByAccount::check_ownership`] before touching a
//! conversation and translate the `Forbidden` error into whatever the
//! operation promises its caller (`NotFound` or `AccessDenied`).

use super::{AccountId, DomainError, ErrorCode};

/// Trait for aggregates that have a single owning account.
pub trait OwnedByAccount {
    /// Returns the ID of the account that owns this resource.
    fn owner_id(&self) -> &AccountId;

    /// Checks if the given account is the owner.
    fn is_owned_by(&self, account_id: &AccountId) -> bool {
        self.owner_id() == account_id
    }

    /// Validates ownership, returning a `Forbidden` error if the account is
    /// not the owner.
    fn check_ownership(&self, account_id: &AccountId) -> Result<(), DomainError> {
        if self.is_owned_by(account_id) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "Account does not own this resource",
            )
            .with_detail("owner_id", self.owner_id().to_string())
            .with_detail("requested_by", account_id.to_string()))
        }
    }
}
