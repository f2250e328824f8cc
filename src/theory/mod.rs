pub mod pitch;
pub mod scale;
