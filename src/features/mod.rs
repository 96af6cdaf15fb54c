//! Features built on the activation framework

pub mod safe_walk;
pub mod silent_hotbar;

pub use safe_walk::SafeWalk;
pub use silent_hotbar::SilentHotbar;
