pub mod auth;
pub mod db;
pub mod notify;
pub mod storage;
pub mod utils;
