//! Golden snapshot of the early-game crafting chain, one action per tick:
//! three planks crafts, a crafting table, sticks, placing and opening the table,
//! a wooden pickaxe, then mining a stone cell.
//!
//! Regenerate with `MDS_UPDATE_SNAPSHOTS=1` after an intended change.

use glam::Vec2;
use mdsandbox_core::{CraftingContext, ItemType};
use mdsandbox_physics::BLOCK_SIZE;
use mdsandbox_testkit::{run_snapshot_scenario, ScenarioConfig};
use mdsandbox_world::{GameConfig, GameState, GridWorld, ItemSink, Player, TickInput};
use serde::Serialize;
use std::path::PathBuf;

const SURFACE: i32 = 40;

fn snapshot_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/snapshots")
        .join(name)
}

#[derive(Debug, Clone, Serialize)]
struct Snap {
    bench_open: bool,
    cobblestone: u32,
    crafting_table: u32,
    planks: u32,
    stick: u32,
    table_cell: &'static str,
    target_block: &'static str,
    wood: u32,
    wooden_pickaxe: u32,
}

fn flat_game() -> GameState {
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
    game.inventory.add_item(ItemType::Wood, 3);
    game
}

fn select(game: &mut GameState, item: ItemType) {
    let slot = game
        .inventory
        .slots()
        .as_slice()
        .iter()
        .position(|slot| slot.map(|stack| stack.item_type) == Some(item))
        .unwrap_or_else(|| panic!("{} not in inventory", item.name()));
    game.inventory.select(slot);
}

fn place(game: &mut GameState, item: ItemType, cells: &[usize]) {
    select(game, item);
    for &index in cells {
        assert!(game.bench_place(index));
    }
}

fn take(game: &mut GameState) {
    assert!(game.bench_take().is_some());
}

fn step(tick: u64, game: &mut GameState) {
    match tick {
        0..=2 => {
            if tick == 0 {
                game.open_bench(CraftingContext::Hand);
            }
            place(game, ItemType::Wood, &[0]);
            take(game);
        }
        3 => {
            place(game, ItemType::Planks, &[0, 1, 2, 3]);
            take(game);
        }
        4 => {
            place(game, ItemType::Planks, &[0, 2]);
            take(game);
            game.close_bench();
        }
        5 => {
            select(game, ItemType::CraftingTable);
            game.interact(22, SURFACE - 1);
            game.interact(22, SURFACE - 1);
        }
        6 => {
            place(game, ItemType::Planks, &[0, 1, 2]);
            place(game, ItemType::Stick, &[4, 7]);
            take(game);
            game.close_bench();
        }
        7 => {
            select(game, ItemType::WoodenPickaxe);
            game.interact(21, SURFACE);
            let total = game.mining.total_required_ms();
            game.tick(&TickInput::default(), total);
        }
        _ => {}
    }
}

#[test]
fn crafting_chain_matches_golden() {
    run_snapshot_scenario(
        &ScenarioConfig {
            name: "crafting_chain_micro".to_string(),
            ticks: 8,
        },
        snapshot_path("crafting_chain_micro.json"),
        flat_game(),
        |tick, game: &mut GameState| step(tick.0, game),
        |_, game: &GameState| Snap {
            bench_open: game.bench().is_some(),
            cobblestone: game.inventory.count(ItemType::Cobblestone),
            crafting_table: game.inventory.count(ItemType::CraftingTable),
            planks: game.inventory.count(ItemType::Planks),
            stick: game.inventory.count(ItemType::Stick),
            table_cell: game.world.get_block(22, SURFACE - 1).name(),
            target_block: game.world.get_block(21, SURFACE).name(),
            wood: game.inventory.count(ItemType::Wood),
            wooden_pickaxe: game.inventory.count(ItemType::WoodenPickaxe),
        },
    )
    .expect("crafting chain matches its golden snapshot");
}
