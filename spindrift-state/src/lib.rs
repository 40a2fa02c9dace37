//! Sharded sparse quantum-state engine
//!
//! The centerpiece is [`ShardedState`], a sparse map from packed spin
//! configurations to complex coefficients, split into power-of-two many
//! shards routed by the first configuration byte. States grow under the
//! action of sparse operators and are truncated back to a soft size bound
//! between iterations, either by deterministic smallest-weight pruning or
//! by weighted random resampling over an [`AliasTable`].
//!
//! Parallel accumulation goes through a [`StateBuilder`]: one bounded
//! SPSC queue and one worker thread per shard, no locks on the hot path.
//!
//! # Example
//!
//! ```
//! use num_complex::Complex64;
//! use spindrift_state::{ShardedState, StateBuilder, StateOptions};
//!
//! let options = StateOptions::new().with_soft_max(100).with_num_shards(4);
//! let mut state = ShardedState::new(options).unwrap();
//!
//! let mut builder = StateBuilder::new(&mut state);
//! builder.start();
//! builder.push(Complex64::new(1.0, 0.0), "0101".parse().unwrap());
//! builder.push(Complex64::new(0.5, 0.0), "0101".parse().unwrap());
//! builder.stop().unwrap();
//! drop(builder);
//!
//! assert_eq!(
//!     state.find(&"0101".parse().unwrap()),
//!     Some(Complex64::new(1.5, 0.0))
//! );
//! ```

pub mod alias;
pub mod builder;
pub mod error;
pub mod io;
pub mod rng;
pub mod sharded_state;
mod updater;

pub use alias::AliasTable;
pub use builder::StateBuilder;
pub use error::{Result, StateError};
pub use io::{read_state, write_state, write_state_with_comments};
pub use rng::reseed;
pub use sharded_state::{ShardMap, ShardedState, StateOptions, StateStats, MAX_SHARDS};

pub use spindrift_core::{Spin, SpinConfiguration};
