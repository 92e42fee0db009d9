use super::*;

fn seeded() -> CartCache {
    let cache = CartCache::new();
    cache.replace(CartSummary {
        cart_items: vec![
            CartItem {
                id: 1,
                quantity: 2,
                ..CartItem::default()
            },
            CartItem {
                id: 2,
                quantity: 1,
                ..CartItem::default()
            },
        ],
        ..CartSummary::default()
    });
    cache
}

#[test]
fn empty_cache_ignores_patches() {
    let cache = CartCache::new();
    assert!(cache.needs_refresh());
    let cmd = cache.apply(CartPatch::Remove { item_id: 1 });
    assert!(!cmd.changed());
    assert!(!cache.revert(&cmd));
}

#[test]
fn independent_commands_revert_independently() {
    let cache = seeded();
    let a = cache.apply(CartPatch::SetQuantity {
        item_id: 1,
        quantity: 5,
    });
    let b = cache.apply(CartPatch::Remove { item_id: 2 });
    assert_eq!(cache.snapshot().unwrap().cart_items.len(), 1);

    assert!(cache.revert(&a));
    assert_eq!(cache.item(1).unwrap().quantity, 2);
    assert!(cache.item(2).is_none());

    assert!(cache.revert(&b));
    assert_eq!(cache.item(2).unwrap().quantity, 1);
}

#[test]
fn revert_after_clear_is_tolerated() {
    let cache = seeded();
    let cmd = cache.apply(CartPatch::Remove { item_id: 1 });
    cache.clear();
    assert!(!cache.revert(&cmd));
    assert!(cache.snapshot().is_none());
}

#[test]
fn invalidate_marks_stale_until_replaced() {
    let cache = seeded();
    assert!(!cache.needs_refresh());
    cache.invalidate();
    assert!(cache.needs_refresh());
    cache.replace(CartSummary::default());
    assert!(!cache.needs_refresh());
}
