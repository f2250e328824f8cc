pub mod event;
pub mod quantize;
pub mod store;
