pub mod attendance;
pub mod records;
pub mod students;
