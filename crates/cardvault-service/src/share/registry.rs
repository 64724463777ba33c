//! Adapter selection by resource kind.

use std::sync::Arc;

use cardvault_auth::PermissionResolver;
use cardvault_database::store::Stores;
use cardvault_entity::resource::ResourceKind;

use super::adapter::{AdapterBase, ShareAdapter};
use super::card::CardShareAdapter;
use super::gift_card::GiftCardShareAdapter;
use super::voucher::VoucherShareAdapter;

/// One share adapter per resource kind.
#[derive(Clone)]
pub struct ShareAdapters {
    card: Arc<dyn ShareAdapter>,
    voucher: Arc<dyn ShareAdapter>,
    gift_card: Arc<dyn ShareAdapter>,
}

impl std::fmt::Debug for ShareAdapters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareAdapters").finish_non_exhaustive()
    }
}

impl ShareAdapters {
    /// Build the three adapters over one store set.
    pub fn new(stores: &Stores, resolver: &PermissionResolver) -> Self {
        let base = |kind| {
            AdapterBase::new(
                kind,
                resolver.clone(),
                stores.users.clone(),
                stores.shares.clone(),
            )
        };
        Self {
            card: Arc::new(CardShareAdapter::new(base(ResourceKind::Card))),
            voucher: Arc::new(VoucherShareAdapter::new(base(ResourceKind::Voucher))),
            gift_card: Arc::new(GiftCardShareAdapter::new(base(ResourceKind::GiftCard))),
        }
    }

    /// The adapter serving `kind`.
    pub fn for_kind(&self, kind: ResourceKind) -> &dyn ShareAdapter {
        match kind {
            ResourceKind::Card => self.card.as_ref(),
            ResourceKind::Voucher => self.voucher.as_ref(),
            ResourceKind::GiftCard => self.gift_card.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardvault_database::MemoryStore;

    #[test]
    fn test_capabilities_per_kind() {
        let stores = Stores::memory(MemoryStore::new());
        let adapters = ShareAdapters::new(&stores, &PermissionResolver::from_stores(&stores));

        for kind in ResourceKind::ALL {
            let adapter = adapters.for_kind(kind);
            assert_eq!(adapter.kind(), kind);
            assert_eq!(adapter.supports_edit(), kind.grain().edit_delete);
            assert_eq!(adapter.has_transaction_permission(), kind.grain().transactions);
        }
    }
}
