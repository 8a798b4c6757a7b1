//! Path replay
//!
//! Everything needed to hand a walked path to someone else and play it back:
//!
//! - [`codec`]: path ⇄ URL-safe share token, and share URLs
//! - [`PhaseClock`]: the four-step-per-level reveal schedule
//! - [`TimerSlot`] and [`Sequencer`]: deadlines that drive the clock
//! - [`journey`]: what each level of a replay shows
//!
//! ```
//! use path_replay::codec::{decode, encode};
//! use scenario_tree::NodeId;
//!
//! let path = vec![NodeId::from("b"), NodeId::from("b-1")];
//! let token = encode(&path);
//! assert_eq!(decode(token.as_str()).unwrap(), path);
//! ```

pub mod clock;
pub mod codec;
mod error;
pub mod journey;
mod sequencer;
mod timer;

pub use clock::{LevelReveal, Phase, PhaseClock, PhaseTimings, PHASES_PER_LEVEL};
pub use codec::{ShareLink, ShareToken};
pub use error::{CodecError, TokenFault};
pub use journey::{JourneyLevel, ResolvedPath};
pub use sequencer::Sequencer;
pub use timer::TimerSlot;
