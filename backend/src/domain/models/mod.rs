pub mod attendance;
pub mod group;
pub mod student;
pub mod transaction;
