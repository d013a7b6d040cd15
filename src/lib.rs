//! Tic-tac-toe game engine: board rules, computer strategies and a session
//! controller with delayed computer moves.

pub mod console;
pub mod engine;
pub mod games;
