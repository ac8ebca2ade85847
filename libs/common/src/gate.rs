//! Role gate applied to validated sessions
//!
//! Each protected operation declares the set of roles allowed to call it;
//! the gate itself is a single membership check.

use crate::error::ServiceError;
use crate::role::Role;

/// Set of roles allowed to perform an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSet(&'static [Role]);

impl RoleSet {
    pub const ANY: RoleSet = RoleSet(&[Role::Admin, Role::Seller, Role::Customer]);
    pub const ADMIN_ONLY: RoleSet = RoleSet(&[Role::Admin]);
    pub const SELLER_ONLY: RoleSet = RoleSet(&[Role::Seller]);
    pub const CUSTOMER_ONLY: RoleSet = RoleSet(&[Role::Customer]);
    pub const ADMIN_OR_SELLER: RoleSet = RoleSet(&[Role::Admin, Role::Seller]);
    pub const ADMIN_OR_CUSTOMER: RoleSet = RoleSet(&[Role::Admin, Role::Customer]);
    pub const SELLER_OR_CUSTOMER: RoleSet = RoleSet(&[Role::Seller, Role::Customer]);

    pub const fn new(roles: &'static [Role]) -> Self {
        RoleSet(roles)
    }

    pub fn allows(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn roles(&self) -> &'static [Role] {
        self.0
    }
}

/// Check that `role` belongs to `allowed`
pub fn authorize(role: Role, allowed: RoleSet) -> Result<(), ServiceError> {
    if allowed.allows(role) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_is_denied_admin_and_seller_operations() {
        assert!(matches!(
            authorize(Role::Customer, RoleSet::ADMIN_ONLY),
            Err(ServiceError::Forbidden)
        ));
        assert!(matches!(
            authorize(Role::Customer, RoleSet::SELLER_ONLY),
            Err(ServiceError::Forbidden)
        ));
        assert!(authorize(Role::Customer, RoleSet::CUSTOMER_ONLY).is_ok());
    }

    #[test]
    fn mixed_sets_admit_exactly_their_members() {
        let cases = [
            (RoleSet::ADMIN_OR_SELLER, [true, true, false]),
            (RoleSet::ADMIN_OR_CUSTOMER, [true, false, true]),
            (RoleSet::SELLER_OR_CUSTOMER, [false, true, true]),
            (RoleSet::ANY, [true, true, true]),
        ];

        for (set, expected) in cases {
            for (role, allowed) in Role::ALL.into_iter().zip(expected) {
                assert_eq!(set.allows(role), allowed, "{role} in {set:?}");
            }
        }
    }
}
