//! Snake on a toroidal grid.
//!
//! The simulation ([`game::GameState`]) is a pure per-tick state machine;
//! [`session::run_session`] drives it against an input source, a render sink
//! and a tick clock. The terminal implementations of those live in
//! [`renderer`] and [`terminal_runtime`].

pub mod config;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod renderer;
pub mod session;
pub mod snake;
pub mod terminal_runtime;
