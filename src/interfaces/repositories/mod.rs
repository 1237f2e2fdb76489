pub mod activity;
pub mod contact;
pub mod media;
pub mod news;
pub mod page;
pub mod program;
pub mod session;
pub mod setting;
pub mod sqlx_repo;
pub mod staff;
pub mod user;
