//! Sweeper stages
//!
//! Bring-up opens the hardware, the sweep runs until a shutdown request.
//! Both work on a shared [`PanTilt`](pantilt_drivers::PanTilt) so that
//! whatever was brought up gets cleaned up.

pub mod bring_up;
pub mod sweep;

pub use bring_up::bring_up;
pub use sweep::sweep;
