//! Game simulation modules

pub mod collision;
pub mod geometry;
pub mod r#loop;
pub mod projectile;
pub mod rules;
pub mod ship;
pub mod snapshot;
pub mod spawner;
pub mod state;

pub use r#loop::GameLoop;
pub use state::CombatStateMachine;
