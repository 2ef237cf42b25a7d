//! Shop stock, selection and purchases.

use std::collections::HashMap;

use tracing::info;

/// Played after a purchase.
pub const CUE_PURCHASE: &str = "purchase";
/// Played when a purchase is refused.
pub const CUE_DENIED: &str = "denied";
/// Played when the shop closes.
pub const CUE_CLOSE: &str = "shop_close";

/// An item offered by the shop. `limit` is the initial stock read from the
/// map; stock only ever goes down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopItem {
    /// Item name, also the price list key.
    pub name: String,
    /// Stock read from the map.
    pub limit: u32,
    /// Units left.
    pub stock: u32,
}

impl ShopItem {
    /// Item with full stock.
    pub fn new(name: impl Into<String>, limit: u32) -> Self {
        ShopItem {
            name: name.into(),
            limit,
            stock: limit,
        }
    }
}

/// Why a purchase did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Not enough gold.
    InsufficientFunds,
    /// None left.
    OutOfStock,
    /// No price in the price list.
    NoPrice,
    /// The shop has no items.
    Empty,
}

/// Result of confirming in the shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseOutcome {
    /// One unit sold.
    Purchased {
        /// Item bought.
        name: String,
        /// Gold taken.
        price: u32,
    },
    /// Nothing sold.
    Denied(DenyReason),
}

impl PurchaseOutcome {
    /// Sound cue for the outcome.
    pub fn cue(&self) -> &'static str {
        match self {
            PurchaseOutcome::Purchased { .. } => CUE_PURCHASE,
            PurchaseOutcome::Denied(_) => CUE_DENIED,
        }
    }
}

/// Item selection and purchase.
#[derive(Debug, Clone, Default)]
pub struct Shop {
    visible: bool,
    selected: usize,
}

impl Shop {
    /// The shop is open.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Highlighted item index.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Returns `true` only when the shop was closed before.
    pub fn open(&mut self) -> bool {
        if self.visible {
            return false;
        }
        self.visible = true;
        info!("shop_opened");
        true
    }

    /// Returns `true` only when the shop was open before.
    pub fn close(&mut self) -> bool {
        if !self.visible {
            return false;
        }
        self.visible = false;
        info!("shop_closed");
        true
    }

    /// Move the highlight, wrapping at both ends.
    pub fn navigate(&mut self, delta: i32, item_count: usize) {
        if item_count == 0 {
            return;
        }
        let count = item_count as i32;
        self.selected = (self.selected as i32 + delta).rem_euclid(count) as usize;
    }

    /// Buy one of the highlighted item if it is affordable and in stock.
    /// A denied purchase changes nothing.
    pub fn confirm(
        &mut self,
        items: &mut [ShopItem],
        gold: &mut u32,
        prices: &HashMap<String, u32>,
    ) -> PurchaseOutcome {
        let Some(item) = items.get_mut(self.selected) else {
            return PurchaseOutcome::Denied(DenyReason::Empty);
        };
        let Some(price) = prices.get(&item.name).copied() else {
            info!(item = %item.name, "purchase_denied_no_price");
            return PurchaseOutcome::Denied(DenyReason::NoPrice);
        };
        if item.stock == 0 {
            info!(item = %item.name, "purchase_denied_out_of_stock");
            return PurchaseOutcome::Denied(DenyReason::OutOfStock);
        }
        if *gold < price {
            info!(item = %item.name, price, gold = *gold, "purchase_denied_funds");
            return PurchaseOutcome::Denied(DenyReason::InsufficientFunds);
        }
        *gold -= price;
        item.stock -= 1;
        info!(item = %item.name, price, stock = item.stock, gold = *gold, "purchased");
        PurchaseOutcome::Purchased {
            name: item.name.clone(),
            price,
        }
    }
}
