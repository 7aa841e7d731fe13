//! Grid snake: a fixed-tick snake engine with a terminal front end.
//!
//! [`game::GameEngine`] holds all game rules and is independent of any
//! terminal. [`session::Session`] hosts it, owning the tick timer and the
//! score store, while rendering and input are injected through the
//! [`renderer::Renderer`] and [`input::InputSource`] traits.

pub mod config;
pub mod error;
pub mod food;
pub mod game;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod scheduler;
pub mod score;
pub mod session;
pub mod snake;
pub mod ui;
