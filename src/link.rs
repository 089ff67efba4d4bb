//! Link properties of a bearer and the merger that derives them from radio
//! responses.
//!
//! 承载的链路属性，以及从无线电响应中推导链路属性的合并器。

pub mod merge;
pub mod properties;

pub use merge::{MergeRejection, SystemDefaults, merge_response};
pub use properties::{LinkAddress, LinkCapabilities, LinkProperties, ProxyProperties, RouteInfo};
