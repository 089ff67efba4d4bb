#![deny(clippy::expect_used, clippy::unwrap_used)]

//! The root of the data bearer library.
//! 数据承载库的根。
//!
//! A bearer is one packet-data connection to the network, shared by every
//! client (access-point context) attached to it. Each bearer runs as a tokio
//! actor around a state machine; owners drive it through a [`BearerHandle`]
//! and receive completions through per-request channels.

pub mod apn;
pub mod bearer;
pub mod config;
pub mod error;
pub mod fail_cause;
pub mod fault;
pub mod link;
pub mod radio;
pub mod retry;

pub use apn::ApnConfig;
pub use bearer::{BearerBuilder, BearerHandle, BearerState, ClientRef, SetupFailure};
pub use config::Config;
pub use error::{Error, Result};
pub use fail_cause::FailCause;
