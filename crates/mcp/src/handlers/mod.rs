#![forbid(unsafe_code)]

mod days;
mod goals;
mod history;
mod system;
mod tasks;

pub(crate) use days::*;
pub(crate) use goals::*;
pub(crate) use history::*;
pub(crate) use system::*;
pub(crate) use tasks::*;
