use uuid::Uuid;

use crate::error::{Error, Result};

/// A record that belongs to exactly one user.
pub trait Owned {
    fn owner(&self) -> Uuid;
}

/// Reject access by anyone but the owner of `resource`.
pub fn ensure_owner<T: Owned>(resource: &T, user_id: Uuid) -> Result<()> {
    if resource.owner() == user_id {
        Ok(())
    } else {
        Err(Error::Forbidden("Access denied".to_string()))
    }
}
