pub mod catalog;
pub mod profile;
pub mod review;
pub mod search;
