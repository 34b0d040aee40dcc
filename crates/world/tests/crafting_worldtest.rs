//! Crafting Worldtest
//!
//! Walks the early-game crafting chain through the game state:
//! wood -> planks -> crafting table and sticks -> placed table -> wooden pickaxe ->
//! mined cobblestone. Also covers junk results for unknown patterns and closing a
//! grid with items still on it.

use glam::Vec2;
use mdsandbox_core::{CraftResult, CraftingContext, ItemType};
use mdsandbox_physics::BLOCK_SIZE;
use mdsandbox_world::{
    GameConfig, GameState, GridWorld, InteractOutcome, ItemSink, Player, TickInput,
};

const SURFACE: i32 = 40;

fn game() -> GameState {
    let mut world = GridWorld::new(40, 60);
    for x in 0..40 {
        for y in SURFACE..60 {
            world.set_block(x, y, ItemType::Stone);
        }
    }
    let config = GameConfig {
        seed: 3,
        start_time: 0.25,
        ..GameConfig::default()
    };
    let mut game = GameState::from_world(config, world);
    game.player.body.pos = Vec2::new(
        20.0 * BLOCK_SIZE,
        SURFACE as f32 * BLOCK_SIZE - Player::size().y,
    );
    game
}

fn slot_of(game: &GameState, item: ItemType) -> usize {
    game.inventory
        .slots()
        .as_slice()
        .iter()
        .position(|slot| slot.map(|stack| stack.item_type) == Some(item))
        .unwrap_or_else(|| panic!("{} not in inventory", item.name()))
}

fn place_from(game: &mut GameState, item: ItemType, cells: &[usize]) {
    let slot = slot_of(game, item);
    assert!(game.inventory.select(slot));
    for &cell in cells {
        assert!(game.bench_place(cell), "cell {cell} accepts {}", item.name());
    }
}

#[test]
fn wood_to_pickaxe_to_cobblestone() {
    let mut game = game();
    game.inventory.add_item(ItemType::Wood, 3);

    game.open_bench(CraftingContext::Hand);
    for _ in 0..3 {
        place_from(&mut game, ItemType::Wood, &[0]);
        assert_eq!(
            game.bench_take(),
            Some(CraftResult::new(ItemType::Planks, 4))
        );
    }
    assert_eq!(game.inventory.count(ItemType::Wood), 0);
    assert_eq!(game.inventory.count(ItemType::Planks), 12);

    place_from(&mut game, ItemType::Planks, &[0, 1, 2, 3]);
    assert_eq!(
        game.bench_take(),
        Some(CraftResult::new(ItemType::CraftingTable, 1))
    );
    place_from(&mut game, ItemType::Planks, &[0, 2]);
    assert_eq!(game.bench_take(), Some(CraftResult::new(ItemType::Stick, 4)));
    assert_eq!(game.close_bench(), 0);
    assert_eq!(game.inventory.count(ItemType::Planks), 6);

    // Hand grids cannot make tools.
    game.open_bench(CraftingContext::Hand);
    place_from(&mut game, ItemType::Planks, &[0, 1]);
    assert_ne!(
        game.bench().and_then(|bench| bench.preview(game.recipes())).map(|r| r.item),
        Some(ItemType::WoodenPickaxe)
    );
    assert_eq!(game.close_bench(), 0);
    assert_eq!(game.inventory.count(ItemType::Planks), 6);

    let table_slot = slot_of(&game, ItemType::CraftingTable);
    game.inventory.select(table_slot);
    assert_eq!(
        game.interact(22, SURFACE - 1),
        InteractOutcome::Placed(ItemType::CraftingTable)
    );
    assert_eq!(game.inventory.selected_item(), None);
    assert_eq!(game.interact(22, SURFACE - 1), InteractOutcome::OpenedBench);

    place_from(&mut game, ItemType::Planks, &[0, 1, 2]);
    place_from(&mut game, ItemType::Stick, &[4, 7]);
    assert_eq!(
        game.bench_take(),
        Some(CraftResult::new(ItemType::WoodenPickaxe, 1))
    );
    assert_eq!(game.close_bench(), 0);
    assert_eq!(game.inventory.count(ItemType::Planks), 3);
    assert_eq!(game.inventory.count(ItemType::Stick), 2);

    let pick = slot_of(&game, ItemType::WoodenPickaxe);
    game.inventory.select(pick);
    assert_eq!(game.interact(21, SURFACE), InteractOutcome::Mining(ItemType::Stone));
    let total = game.mining.total_required_ms();
    game.tick(&TickInput::default(), total);
    assert_eq!(game.inventory.count(ItemType::Cobblestone), 1);
}

#[test]
fn unknown_patterns_craft_junk() {
    let mut game = game();
    game.inventory.add_item(ItemType::Dirt, 2);
    game.inventory.add_item(ItemType::Sand, 1);

    game.open_bench(CraftingContext::Hand);
    place_from(&mut game, ItemType::Dirt, &[1]);
    assert_eq!(
        game.bench().and_then(|bench| bench.preview(game.recipes())),
        Some(CraftResult::new(ItemType::OddDust, 1))
    );
    place_from(&mut game, ItemType::Dirt, &[2]);
    place_from(&mut game, ItemType::Sand, &[3]);
    assert_eq!(
        game.bench_take(),
        Some(CraftResult::new(ItemType::OddDust, 3))
    );
    assert_eq!(game.inventory.count(ItemType::Dirt), 0);
    assert_eq!(game.inventory.count(ItemType::OddDust), 3);
}

#[test]
fn closing_returns_grid_items() {
    let mut game = game();
    game.inventory.add_item(ItemType::Cobblestone, 5);
    game.open_bench(CraftingContext::Table);
    place_from(&mut game, ItemType::Cobblestone, &[0, 4, 8]);
    assert_eq!(game.inventory.count(ItemType::Cobblestone), 2);

    // Clicking an occupied cell hands its item back.
    assert!(game.bench_place(4));
    assert_eq!(game.inventory.count(ItemType::Cobblestone), 3);

    // Reopening closes the previous grid first.
    game.open_bench(CraftingContext::Hand);
    assert_eq!(game.inventory.count(ItemType::Cobblestone), 5);
    assert_eq!(game.close_bench(), 0);
    assert!(game.bench().is_none());
}
