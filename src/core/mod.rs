pub mod phase;
pub mod pitch;
pub mod timebase;
