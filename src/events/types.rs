//! Typed events delivered by the host
//!
//! Handlers may rewrite the mutable fields of an event before it continues
//! downstream to the host.

/// Movement keys pressed this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectionalInput {
    pub forwards: bool,
    pub backwards: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionalInput {
    pub const NONE: Self = Self {
        forwards: false,
        backwards: false,
        left: false,
        right: false,
    };

    pub const FORWARDS: Self = Self {
        forwards: true,
        ..Self::NONE
    };

    pub fn is_moving(&self) -> bool {
        *self != Self::NONE
    }
}

/// Host queries movement handlers may make about the local player
pub trait PlayerView {
    fn is_on_ground(&self) -> bool;

    fn is_sneaking(&self) -> bool;

    fn is_sprinting(&self) -> bool;

    /// Whether moving with `input` would bring the player within
    /// `distance` of a ledge
    fn is_close_to_edge(&self, input: DirectionalInput, distance: f64) -> bool;

    /// Fall distance accumulated after simulating `ticks` ticks of `input`
    fn predicted_fall_distance(&self, input: DirectionalInput, jumping: bool, ticks: u32) -> f64;
}

/// Raw movement input, before the host applies it
pub struct MovementInputEvent<'a> {
    pub player: &'a dyn PlayerView,
    pub directional_input: DirectionalInput,
    pub jumping: bool,
}

/// Asked by the host before it lets the player walk off ledges
#[derive(Debug, Clone, Copy, Default)]
pub struct SafeWalkEvent {
    pub is_safe_walk: bool,
}

pub enum Event<'a> {
    GameTick,
    MovementInput(MovementInputEvent<'a>),
    SafeWalk(SafeWalkEvent),
}
