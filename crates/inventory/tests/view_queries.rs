//! End-to-end behaviour of views and query operators over real containers.

use slotlens_core::{ItemType, PropertyKey, PropertyValue, ValueMatcher};
use slotlens_inventory::{
    share, AppendQuery, CompositeFabric, CompoundLensBuilder, ContainerKind, Fabric, FabricRef,
    GridQuery, Inventory, InventoryError, KeyValueMatcherQuery, LensTreeBuilder, ReverseQuery,
    SlotContainer,
};
use slotlens_testkit::{
    flat_view, grid_view, item_ids, numbered, numbered_container, numbered_stack,
};
use std::cell::RefCell;
use std::rc::Rc;

fn ids(values: &[u16]) -> Vec<Option<u16>> {
    values.iter().copied().map(Some).collect()
}

#[test]
fn composite_fabric_addresses_children_by_prefix_sums() {
    let composite = CompositeFabric::new(vec![numbered(3, 0), numbered(5, 100), numbered(2, 200)]);

    let read = |index: usize| {
        composite
            .get(index)
            .unwrap()
            .and_then(|stack| stack.item_type.numeric_id())
    };
    assert_eq!((0..3).map(read).collect::<Vec<_>>(), ids(&[0, 1, 2]));
    assert_eq!(
        (3..8).map(read).collect::<Vec<_>>(),
        ids(&[100, 101, 102, 103, 104])
    );
    assert_eq!((8..10).map(read).collect::<Vec<_>>(), ids(&[200, 201]));
    assert_eq!(
        composite.get(10),
        Err(InventoryError::IndexOutOfRange { index: 10, size: 10 })
    );
}

#[test]
fn reverse_twice_restores_the_source_order() {
    let fabric = numbered(7, 0);
    let source = grid_view(&fabric, 7, 1);

    let once = source.reverse();
    assert_eq!(item_ids(&once).unwrap(), ids(&[6, 5, 4, 3, 2, 1, 0]));

    let twice = once.reverse();
    assert_eq!(twice.contents().unwrap(), source.contents().unwrap());
}

#[test]
fn reverse_writes_reach_the_source() {
    let fabric = numbered(4, 0);
    let reversed = flat_view(&fabric).reverse();

    reversed.set(0, Some(numbered_stack(42))).unwrap();
    assert_eq!(fabric.borrow().get(3).unwrap(), Some(numbered_stack(42)));
}

#[test]
fn union_aliases_both_containers() {
    let a = numbered(3, 0);
    let b = numbered(2, 10);
    let union = flat_view(&a).union(&flat_view(&b));

    assert_eq!(union.size(), 5);
    assert_eq!(item_ids(&union).unwrap(), ids(&[0, 1, 2, 10, 11]));

    union.set(4, Some(numbered_stack(99))).unwrap();
    assert_eq!(b.borrow().get(1).unwrap(), Some(numbered_stack(99)));

    b.borrow_mut().set(0, Some(numbered_stack(77))).unwrap();
    assert_eq!(union.peek(3).unwrap(), Some(numbered_stack(77)));

    assert_eq!(item_ids(&flat_view(&a)).unwrap(), ids(&[0, 1, 2]));
}

#[test]
fn union_preserves_a_mounted_source_lens() {
    let player = share(ContainerKind::Player.create());
    for slot in 0..36 {
        player
            .borrow_mut()
            .set(slot, Some(numbered_stack(slot as u16)))
            .unwrap();
    }
    let player_view = Inventory::bind(&ContainerKind::Player.standard_lens(), player.clone());
    let main = player_view.children()[1].clone();
    let hopper = numbered(5, 500);

    let union = main.union(&flat_view(&hopper));
    assert_eq!(union.size(), 32);
    assert_eq!(union.peek(0).unwrap(), Some(numbered_stack(9)));
    assert_eq!(union.peek(26).unwrap(), Some(numbered_stack(35)));
    assert_eq!(union.peek(27).unwrap(), Some(numbered_stack(500)));
}

#[test]
fn union_forwards_dirty_flags_to_every_container() {
    let chest = Rc::new(RefCell::new(ContainerKind::Chest.create()));
    let hopper = Rc::new(RefCell::new(ContainerKind::Hopper.create()));
    let chest_ref: FabricRef = chest.clone();
    let hopper_ref: FabricRef = hopper.clone();

    let union = Inventory::bind(&ContainerKind::Chest.standard_lens(), chest_ref)
        .union(&Inventory::bind(&ContainerKind::Hopper.standard_lens(), hopper_ref));
    union.as_adapter().unwrap().mark_dirty();

    assert!(chest.borrow().is_dirty());
    assert!(hopper.borrow().is_dirty());
}

#[test]
fn grid_extraction_returns_row_major_rectangle() {
    let fabric = numbered(9, 0);
    let grid = grid_view(&fabric, 3, 3);

    let corner = grid.grid(0, 0, 2, 2);
    assert_eq!(corner.size(), 4);
    assert_eq!(item_ids(&corner).unwrap(), ids(&[0, 1, 3, 4]));

    let lens = corner.as_adapter().unwrap().root_lens().clone();
    assert_eq!(lens.grid_dimensions(), Some((2, 2)));
    assert_eq!(
        lens.grid_slot(1, 1)
            .unwrap()
            .property(&PropertyKey::SLOT_POSITION),
        Some(&PropertyValue::Position { x: 1, y: 1 })
    );

    let centre = grid.grid(1, 1, 2, 2);
    assert_eq!(item_ids(&centre).unwrap(), ids(&[4, 5, 7, 8]));
}

#[test]
fn grid_extraction_soft_fails_to_an_empty_view() {
    let fabric = numbered(9, 0);
    let grid = grid_view(&fabric, 3, 3);

    let outside = grid.grid(2, 2, 2, 2);
    assert_eq!(outside.size(), 0);
    assert!(outside.contents().unwrap().is_empty());

    assert!(grid.grid(0, 0, 4, 1).is_empty());
    assert!(grid.reverse().grid(0, 0, 1, 1).is_empty());
}

#[test]
fn grid_extraction_with_huge_rectangles_is_empty() {
    let fabric = numbered(9, 0);
    let grid = grid_view(&fabric, 3, 3);

    assert!(grid.grid(usize::MAX, 0, 1, 1).is_empty());
    assert!(grid.grid(0, 1, 1, usize::MAX).is_empty());
    assert!(grid.grid(1, usize::MAX, usize::MAX, 1).is_empty());
}

#[test]
fn grid_extraction_sees_through_mounted_grids() {
    let fabric = numbered(36, 0);
    let player = Inventory::bind(&ContainerKind::Player.standard_lens(), fabric);
    let main = player.children()[1].clone();

    let column = main.grid(0, 0, 1, 3);
    assert_eq!(item_ids(&column).unwrap(), ids(&[9, 18, 27]));
}

#[test]
fn append_of_nothing_is_an_empty_view() {
    let fabric = numbered(4, 0);
    let view = flat_view(&fabric);

    let appended = view.append(Vec::new());
    assert_eq!(appended.size(), 0);
    assert!(appended.contents().unwrap().is_empty());
    assert_eq!(
        appended.peek(0),
        Err(InventoryError::NoSuchSlot { index: 0, size: 0 })
    );
    assert!(appended.children().is_empty());
}

#[test]
fn append_concatenates_sub_results() {
    let fabric = numbered(9, 0);
    let grid = grid_view(&fabric, 3, 3);

    let appended = grid.query(
        &AppendQuery::default()
            .with(GridQuery::new(0, 0, 1, 1))
            .with(ReverseQuery)
            .with(GridQuery::new(5, 5, 1, 1)),
    );
    assert_eq!(appended.size(), 10);
    assert_eq!(appended.children().len(), 3);
    assert_eq!(
        item_ids(&appended).unwrap(),
        ids(&[0, 8, 7, 6, 5, 4, 3, 2, 1, 0])
    );

    appended.set(1, Some(numbered_stack(80))).unwrap();
    assert_eq!(fabric.borrow().get(8).unwrap(), Some(numbered_stack(80)));
}

#[test]
fn appended_views_are_flattened_for_queries() {
    let chest = share(ContainerKind::Chest.create());
    let hopper = share(ContainerKind::Hopper.create());
    let appended = Inventory::appended(vec![
        Inventory::bind(&ContainerKind::Chest.standard_lens(), chest),
        Inventory::bind(&ContainerKind::Hopper.standard_lens(), hopper.clone()),
    ]);

    let found = appended.matching(ValueMatcher::equal(
        PropertyKey::TITLE,
        PropertyValue::text("Hopper"),
    ));
    assert_eq!(found.size(), 5);

    found.set(2, Some(numbered_stack(5))).unwrap();
    assert_eq!(hopper.borrow().get(2).unwrap(), Some(numbered_stack(5)));

    let reversed = appended.reverse();
    assert_eq!(reversed.size(), 32);
    assert_eq!(reversed.peek(2).unwrap(), Some(numbered_stack(5)));
}

#[test]
fn search_prefers_slot_properties_on_primitive_storage() {
    let mut furnace = ContainerKind::Furnace.create();
    furnace
        .set(0, Some(slotlens_core::ItemStack::new(ItemType::Block(12), 3)))
        .unwrap();
    let view = Inventory::bind(&ContainerKind::Furnace.standard_lens(), share(furnace));

    let fuel = view.matching(ValueMatcher::equal(
        PropertyKey::SLOT_ROLE,
        PropertyValue::text("fuel"),
    ));
    assert_eq!(fuel.size(), 1);
    fuel.set(0, Some(numbered_stack(263))).unwrap();
    assert_eq!(view.peek(1).unwrap(), Some(numbered_stack(263)));

    let occupied = view.matching(ValueMatcher::present(PropertyKey::ITEM));
    assert_eq!(occupied.size(), 2);

    let whole = view.matching(ValueMatcher::equal(
        PropertyKey::TITLE,
        PropertyValue::text("Furnace"),
    ));
    assert_eq!(whole.size(), 3);
}

#[test]
fn search_matches_container_properties_across_a_union() {
    let chest = share(ContainerKind::Chest.create_titled("Loot"));
    let hopper = share(ContainerKind::Hopper.create());
    let union = flat_view(&chest).union(&flat_view(&hopper));

    let loot = union.matching(ValueMatcher::equal(PropertyKey::TITLE, PropertyValue::text("Loot")));
    assert_eq!(loot.size(), 27);

    let kinds = union.matching(ValueMatcher::present(PropertyKey::CONTAINER_KIND));
    assert_eq!(kinds.size(), 32);

    loot.set(26, Some(numbered_stack(1))).unwrap();
    assert_eq!(chest.borrow().get(26).unwrap(), Some(numbered_stack(1)));
}

#[test]
fn search_falls_back_to_lens_properties() {
    let fabric = numbered(36, 0);
    let player = Inventory::bind(&ContainerKind::Player.standard_lens(), fabric);

    let main = player.matching(ValueMatcher::equal(
        PropertyKey::SLOT_ROLE,
        PropertyValue::text("main"),
    ));
    assert_eq!(main.size(), 27);
    assert_eq!(main.peek(0).unwrap(), Some(numbered_stack(9)));
    assert_eq!(main.peek(26).unwrap(), Some(numbered_stack(35)));

    let missing = player.matching(ValueMatcher::equal(
        PropertyKey::SLOT_ROLE,
        PropertyValue::text("armor"),
    ));
    assert!(missing.is_empty());
}

#[test]
fn search_offsets_accumulate_through_nested_mounts() {
    let fabric = numbered(5, 0);
    let mut tree = LensTreeBuilder::new();
    let top = tree.grid(0, 2, 1);
    let shallow = tree.grid(0, 1, 1);
    let deep = tree.grid(0, 2, 1);
    tree.set_property(deep, PropertyKey::TITLE, PropertyValue::text("deep"));
    let deep_mount = tree.delegating(1, deep);
    let inner = CompoundLensBuilder::new()
        .add(shallow)
        .add(deep_mount)
        .build(&mut tree);
    let inner_mount = tree.delegating(2, inner);
    let root = CompoundLensBuilder::new()
        .add(top)
        .add(inner_mount)
        .build(&mut tree);
    let lens = tree.build(root);
    assert!(lens.tiles_contiguously());

    let adapter = lens.adapter(fabric.clone());
    let query = KeyValueMatcherQuery::new(ValueMatcher::equal(
        PropertyKey::TITLE,
        PropertyValue::text("deep"),
    ));
    let found = query.find(&adapter);
    assert_eq!(found.len(), 1);
    // root (0) + inner mount (2) + inner compound (0) + deep mount (1)
    assert_eq!(found[0].offset(), 3);

    let view = Inventory::from_adapter(adapter);
    let result = view.query(&query);
    assert_eq!(item_ids(&result).unwrap(), ids(&[3, 4]));
}

#[test]
fn search_without_matches_is_empty() {
    let fabric = share(numbered_container(4, 0));
    let view = flat_view(&fabric);
    let result = view.query(&KeyValueMatcherQuery::new(ValueMatcher::equal(
        PropertyKey::ITEM,
        PropertyValue::Item(ItemType::Block(1)),
    )));
    assert!(result.is_empty());
}

#[test]
fn queries_compose_without_error_handling() {
    let fabric = numbered(9, 0);
    let other = share(SlotContainer::new(2));
    let view = grid_view(&fabric, 3, 3)
        .grid(1, 0, 2, 3)
        .reverse()
        .union(&flat_view(&other))
        .grid(0, 0, 1, 1);

    assert!(view.is_empty());
    assert_eq!(item_ids(&view).unwrap(), Vec::<Option<u16>>::new());
}

#[test]
fn child_views_follow_the_lens_tree() {
    let fabric = numbered(36, 0);
    let player = Inventory::bind(&ContainerKind::Player.standard_lens(), fabric);
    let children = player.children();

    assert_eq!(children.len(), 2);
    assert_eq!(children[0].size(), 9);
    assert_eq!(children[1].size(), 27);
    assert_eq!(children[1].peek(0).unwrap(), Some(numbered_stack(9)));
    assert_eq!(children[1].children().len(), 1);
}
