use std::sync::Arc;

use super::domain::PrincipalId;
use super::store::PrivilegeDirectory;

/// Single entry point for privilege checks. Every mutating operation asks
/// the gate before touching the store; the check is made once per
/// operation and never cached across requests.
pub struct AuthorizationGate<P> {
    directory: Arc<P>,
}

impl<P> AuthorizationGate<P>
where
    P: PrivilegeDirectory,
{
    pub fn new(directory: Arc<P>) -> Self {
        Self { directory }
    }

    pub async fn require_admin(&self, principal: &PrincipalId) -> Result<(), Unauthorized> {
        if self.directory.is_admin(principal).await {
            Ok(())
        } else {
            Err(Unauthorized {
                principal: principal.clone(),
            })
        }
    }
}

/// Raised when the acting principal does not hold administrator privilege.
#[derive(Debug, thiserror::Error)]
#[error("principal {} is not an administrator", principal.0)]
pub struct Unauthorized {
    pub principal: PrincipalId,
}
