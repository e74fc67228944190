//! Client-side replica of a shared board.
//!
//! Each client owns exactly one [`store::ReplicaStore`] per joined room and
//! mutates it from a single-threaded event loop: optimistic local apply first,
//! then the caller emits the matching outbound event. Remote events from peers
//! land in the same store through the idempotent `apply_remote_*` operations,
//! so any two replicas that have seen the same set of events converge.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | The replica store: elements, selection, clipboard, z-order |
//! | [`history`] | Capped undo/redo snapshot stack |
//! | [`throttle`] | Outgoing cursor-move rate limiting |
//! | [`consts`] | Shared numeric constants |

pub mod consts;
pub mod history;
pub mod store;
pub mod throttle;

pub use store::ReplicaStore;
pub use throttle::CursorThrottle;
