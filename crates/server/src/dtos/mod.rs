pub mod auth;
pub mod catalog;
pub mod review;
pub mod search;
