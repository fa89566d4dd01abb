//! Point picking: the interaction session that drives the snap providers.
//!
//! A [`SnapEventHandler`] lives for exactly one picked point. It moves through
//! `Idle -> Snapping -> (Inputting) -> Completed | Cancelled`; terminal states
//! absorb every further event, and both terminal paths run the same cleanup
//! (floating tip, entry box, temporary visuals, provider caches, settings
//! subscription).
//!
//! ## Module Structure
//!
//! - [`controller`] - Single-fire success/cancel completion
//! - [`input`] - Typed coordinate entry and its errors
//! - [`handler`] - The session state machine

pub mod controller;
pub mod handler;
pub mod input;


pub use controller::{CompletionController, CompletionState};
pub use handler::{
    default_prompt, starts_input, FeaturePoint, PickEnv, PickKey, PickOutcome, PickState,
    PointSnapData, PointerButton, SnapEventHandler,
};
pub use input::{CoordinateInput, InputError, PointInput};
