pub mod play;
pub mod simulate;

pub use play::PlayMode;
pub use simulate::{SimulateConfig, SimulateMode};
