pub mod case;
pub mod evaluation;
pub mod student;
