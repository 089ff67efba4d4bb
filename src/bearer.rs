//! A single data bearer: its state machine, the actor driving it and the
//! handle owners talk to.
//!
//! 单个数据承载：其状态机、驱动它的actor以及拥有者使用的句柄。

mod actor;
mod clients;
mod handle;
mod machine;
mod message;
mod outcome;
mod record;
mod request;
mod state;

pub use clients::ClientSet;
pub use handle::{BearerBuilder, BearerHandle};
pub use outcome::{LinkUpdate, SetupResult};
pub use request::{
    ClientRef, ConnectResult, Connected, Disconnected, PendingConnect, PendingDisconnect,
    ReconnectIntent, SetupFailure, TrackerNotice,
};
pub use state::BearerState;
