pub mod engine;
pub mod error;
pub mod player;
pub mod renderer;
pub mod types;
pub mod viewport;
