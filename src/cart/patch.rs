use crate::cart::model::{CartItem, CartItemId, CartSummary};

/// A single edit to the cached cart projection.
///
/// Applying a patch yields its inverse, so every optimistic edit travels as a
/// [`CartCommand`] holding both directions.
#[derive(Clone, Debug, PartialEq)]
pub enum CartPatch {
    /// Set the quantity of an existing line.
    SetQuantity {
        item_id: CartItemId,
        quantity: u32,
    },
    /// Drop a line.
    Remove { item_id: CartItemId },
    /// Put a line back at `index` (clamped to the current length).
    Insert { index: usize, item: Box<CartItem> },
}

impl CartPatch {
    /// Item the patch is keyed on.
    pub fn item_id(&self) -> CartItemId {
        match self {
            CartPatch::SetQuantity { item_id, .. } | CartPatch::Remove { item_id } => *item_id,
            CartPatch::Insert { item, .. } => item.id,
        }
    }

    /// Apply in place and return the inverse, or `None` when the summary was left untouched
    /// (target line absent, or already present for an insert).
    pub fn apply(&self, summary: &mut CartSummary) -> Option<CartPatch> {
        match self {
            CartPatch::SetQuantity { item_id, quantity } => {
                let item = summary.cart_items.iter_mut().find(|i| i.id == *item_id)?;
                let previous = std::mem::replace(&mut item.quantity, *quantity);
                Some(CartPatch::SetQuantity {
                    item_id: *item_id,
                    quantity: previous,
                })
            }
            CartPatch::Remove { item_id } => {
                let index = summary.position(*item_id)?;
                let item = summary.cart_items.remove(index);
                Some(CartPatch::Insert {
                    index,
                    item: Box::new(item),
                })
            }
            CartPatch::Insert { index, item } => {
                if summary.position(item.id).is_some() {
                    return None;
                }
                let at = (*index).min(summary.cart_items.len());
                summary.cart_items.insert(at, item.as_ref().clone());
                Some(CartPatch::Remove { item_id: item.id })
            }
        }
    }
}

/// An applied edit paired with the patch that undoes it.
#[derive(Clone, Debug, PartialEq)]
pub struct CartCommand {
    pub forward: CartPatch,
    pub inverse: Option<CartPatch>,
}

impl CartCommand {
    /// Whether applying `forward` changed the cache.
    pub fn changed(&self) -> bool {
        self.inverse.is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cart/patch.rs"]
mod tests;
