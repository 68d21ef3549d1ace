pub mod config;
pub mod menu;
pub mod platform;
pub mod resources;

pub use menu::{Behavior, Engine, Menu, Unwind};
pub use resources::{Resources, SharedResources};
