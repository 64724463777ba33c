//! Table layout per resource kind.

use cardvault_entity::resource::ResourceKind;
use cardvault_entity::share::SharePermissions;

const FLAG_COLUMNS: [&str; 3] = ["can_edit", "can_delete", "can_edit_transactions"];

/// Table names and capability columns for one resource kind.
#[derive(Debug, Clone, Copy)]
pub(crate) struct KindSchema {
    /// Resource table.
    pub resources: &'static str,
    /// Share table.
    pub shares: &'static str,
    /// Capability columns present on the share table.
    pub flags: &'static [&'static str],
}

pub(crate) fn schema(kind: ResourceKind) -> KindSchema {
    match kind {
        ResourceKind::Card => KindSchema {
            resources: "cards",
            shares: "card_shares",
            flags: &["can_edit", "can_delete"],
        },
        ResourceKind::Voucher => KindSchema {
            resources: "vouchers",
            shares: "voucher_shares",
            flags: &[],
        },
        ResourceKind::GiftCard => KindSchema {
            resources: "gift_cards",
            shares: "gift_card_shares",
            flags: &["can_edit", "can_delete", "can_edit_transactions"],
        },
    }
}

impl KindSchema {
    /// Select list producing all three flag columns, `FALSE` where absent.
    pub fn flag_select(&self, alias: &str) -> String {
        FLAG_COLUMNS
            .iter()
            .map(|col| {
                if self.flags.contains(col) {
                    format!("{alias}.{col}")
                } else {
                    format!("FALSE AS {col}")
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Select list for a full [`Share`](cardvault_entity::share::Share) row.
    pub fn share_select(&self, alias: &str) -> String {
        format!(
            "{alias}.id, {alias}.resource_id, {alias}.grantee_id, {alias}.shared_by, {}, \
             {alias}.created_at, {alias}.updated_at, {alias}.deleted_at",
            self.flag_select(alias)
        )
    }

    /// Values for the present capability columns, in column order.
    pub fn flag_values(&self, permissions: SharePermissions) -> Vec<bool> {
        self.flags
            .iter()
            .map(|col| match *col {
                "can_edit" => permissions.can_edit,
                "can_delete" => permissions.can_delete,
                _ => permissions.can_edit_transactions,
            })
            .collect()
    }
}
