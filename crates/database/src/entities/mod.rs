pub mod departments;
pub mod faculties;
pub mod profiles;
pub mod programs;
pub mod reviews;
pub mod universities;
