pub mod auth;
pub mod catalog;
pub mod health;
pub mod review;
pub mod search;
