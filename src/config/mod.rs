pub mod hardware;

pub use hardware::{HardwareConstraints, HardwareProfile, ProfileTable};
