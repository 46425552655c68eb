pub mod names;
pub mod tags;
