mod logout;
mod scheduler;
mod tick;

pub use logout::Redirector;
pub use scheduler::{GuardianHandle, spawn_guardian};
pub use tick::Guardian;
