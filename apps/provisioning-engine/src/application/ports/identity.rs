//! Authenticated caller identity.

use crate::domain::shared::{CompanyId, UserId};

/// The authenticated caller's company and user, supplied by the excluded
/// auth layer. Ownership checks compare against `company_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    /// Company the caller belongs to.
    pub company_id: CompanyId,
    /// The calling user.
    pub user_id: UserId,
}

impl IdentityContext {
    /// Create a new identity context.
    #[must_use]
    pub const fn new(company_id: CompanyId, user_id: UserId) -> Self {
        Self {
            company_id,
            user_id,
        }
    }
}
