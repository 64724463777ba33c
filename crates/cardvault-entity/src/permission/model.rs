//! The effective permissions a user holds on a resource.

use serde::{Deserialize, Serialize};

use crate::resource::ResourceKind;
use crate::share::Share;

/// Effective permissions of one user on one resource.
///
/// Computed on every access check and never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePermissions {
    /// User may view the resource.
    pub can_view: bool,
    /// User may edit the resource.
    pub can_edit: bool,
    /// User may delete the resource.
    pub can_delete: bool,
    /// User may add or edit gift card transactions.
    pub can_edit_transactions: bool,
    /// User is the current owner.
    pub is_owner: bool,
}

impl ResourcePermissions {
    /// Permissions of the owner: everything the kind supports, and more.
    ///
    /// `can_edit_transactions` is only meaningful for gift cards and is
    /// left unset for other kinds.
    pub fn owner(kind: ResourceKind) -> Self {
        Self {
            can_view: true,
            can_edit: true,
            can_delete: true,
            can_edit_transactions: kind.grain().transactions,
            is_owner: true,
        }
    }

    /// Permissions granted by a non-deleted share, masked to the kind's grain.
    pub fn granted_by(kind: ResourceKind, share: &Share) -> Self {
        let flags = share.permissions().masked(kind.grain());
        Self {
            can_view: true,
            can_edit: flags.can_edit,
            can_delete: flags.can_delete,
            can_edit_transactions: flags.can_edit_transactions,
            is_owner: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardvault_core::types::{ResourceId, ShareId, UserId};
    use chrono::Utc;

    fn share(can_edit: bool, can_delete: bool, can_edit_transactions: bool) -> Share {
        Share {
            id: ShareId::new(),
            resource_id: ResourceId::new(),
            grantee_id: UserId::new(),
            shared_by: UserId::new(),
            can_edit,
            can_delete,
            can_edit_transactions,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_owner_of_every_kind_has_full_access() {
        for kind in ResourceKind::ALL {
            let perms = ResourcePermissions::owner(kind);
            assert!(perms.is_owner && perms.can_view && perms.can_edit && perms.can_delete);
        }
        assert!(ResourcePermissions::owner(ResourceKind::GiftCard).can_edit_transactions);
    }

    #[test]
    fn test_voucher_share_ignores_stored_flags() {
        let perms =
            ResourcePermissions::granted_by(ResourceKind::Voucher, &share(true, true, true));
        assert_eq!(
            perms,
            ResourcePermissions {
                can_view: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_gift_card_share_carries_transactions() {
        let perms =
            ResourcePermissions::granted_by(ResourceKind::GiftCard, &share(false, false, true));
        assert!(perms.can_view);
        assert!(perms.can_edit_transactions);
        assert!(!perms.can_edit);
        assert!(!perms.is_owner);
    }
}
