use items_types::{Item, ItemId};

/// Items a freshly started server holds.
pub fn seed_items() -> Vec<Item> {
    vec![
        Item::new(ItemId::new(1), "Apple", Some("A juicy fruit".into())),
        Item::new(ItemId::new(2), "Banana", Some("A yellow fruit".into())),
        Item::new(ItemId::new(3), "Carrot", Some("A crunchy vegetable".into())),
    ]
}
