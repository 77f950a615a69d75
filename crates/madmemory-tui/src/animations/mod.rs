pub mod pulse;

pub use pulse::Pulse;
