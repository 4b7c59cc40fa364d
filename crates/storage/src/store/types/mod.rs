#![forbid(unsafe_code)]

mod days;
mod events;
mod goals;
mod history;
mod tasks;

pub use days::*;
pub use events::*;
pub use goals::*;
pub use history::*;
pub use tasks::*;
