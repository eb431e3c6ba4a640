//! Database access layer for tresor-gx
//!
//! Functions take `&mut SqliteConnection` so the same queries run on a
//! pooled connection or inside an award transaction.

pub mod achievements;
pub mod activities;
pub mod badges;
pub mod leaderboard;
pub mod levels;
pub mod points;
pub mod profiles;
