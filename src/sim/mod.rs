//! Deterministic character-motion simulation
//!
//! All motion logic lives here. This module must stay pure and deterministic:
//! - Time and dt come from the host each tick
//! - Geometry is only seen through the `Obstacles` trait
//! - No rendering, input polling or engine dependencies

pub mod contact;
pub mod jump;
pub mod motion;
pub mod probe;
pub mod resolve;
pub mod state;
pub mod tick;
pub mod world;

pub use contact::{ContactState, GroundTransition};
pub use jump::{Arbitration, Coyote, JumpKind, JumpState, arbitrate};
pub use motion::{solve_horizontal, solve_vertical};
pub use probe::{Contacts, RayRange, Side, probe, ray_ranges};
pub use resolve::{Resolved, resolve_move};
pub use state::{ActorBounds, ActorState, MotionState};
pub use tick::{Actor, FrameInput, TickOutput, tick};
pub use world::{GridWorld, ObstacleRef, Obstacles, QueryError};
