//! Resource kinds and the capability axes each kind supports.

use serde::{Deserialize, Serialize};

/// The kind of a shareable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A loyalty or membership card.
    Card,
    /// A voucher. Shared vouchers are always read-only.
    Voucher,
    /// A gift card with a balance and transaction history.
    GiftCard,
}

/// The permission axes a resource kind exposes on its shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityGrain {
    /// Shares may grant edit and delete.
    pub edit_delete: bool,
    /// Shares may grant editing of transactions.
    pub transactions: bool,
}

impl ResourceKind {
    /// All resource kinds.
    pub const ALL: [ResourceKind; 3] = [Self::Card, Self::Voucher, Self::GiftCard];

    /// Return the kind as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Voucher => "voucher",
            Self::GiftCard => "gift_card",
        }
    }

    /// Human-readable label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Card => "Card",
            Self::Voucher => "Voucher",
            Self::GiftCard => "Gift card",
        }
    }

    /// Capability axes shares of this kind may carry.
    pub fn grain(&self) -> CapabilityGrain {
        match self {
            Self::Card => CapabilityGrain {
                edit_delete: true,
                transactions: false,
            },
            Self::Voucher => CapabilityGrain {
                edit_delete: false,
                transactions: false,
            },
            Self::GiftCard => CapabilityGrain {
                edit_delete: true,
                transactions: true,
            },
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = cardvault_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "card" => Ok(Self::Card),
            "voucher" => Ok(Self::Voucher),
            "gift_card" | "giftcard" => Ok(Self::GiftCard),
            _ => Err(cardvault_core::AppError::validation(format!(
                "Invalid resource type: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_variants() {
        assert_eq!("gift-card".parse::<ResourceKind>().ok(), Some(ResourceKind::GiftCard));
        assert_eq!("GiftCard".parse::<ResourceKind>().ok(), Some(ResourceKind::GiftCard));
        assert_eq!(" Voucher ".parse::<ResourceKind>().ok(), Some(ResourceKind::Voucher));
        assert!("coupon".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_grains() {
        assert!(!ResourceKind::Voucher.grain().edit_delete);
        assert!(ResourceKind::Card.grain().edit_delete);
        assert!(!ResourceKind::Card.grain().transactions);
        assert!(ResourceKind::GiftCard.grain().transactions);
    }
}
