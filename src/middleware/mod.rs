mod guards;
mod json_error;
mod panic;

pub use guards::ActingMember;
pub use json_error::json_error_middleware;
pub use panic::catch_panic_layer;
