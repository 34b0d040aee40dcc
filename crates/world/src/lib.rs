//! Block grid, terrain, creatures, storage and the game tick for the 2D sandbox.

mod bench;
mod block_properties;
mod combat;
mod game;
mod grid;
mod inventory;
mod managers;
mod mining;
mod mob;
mod persist;
mod player;
mod terrain;
mod time;

pub use bench::*;
pub use block_properties::*;
pub use combat::*;
pub use game::*;
pub use grid::*;
pub use inventory::*;
pub use managers::*;
pub use mining::*;
pub use mob::*;
pub use persist::*;
pub use player::*;
pub use terrain::*;
pub use time::*;
