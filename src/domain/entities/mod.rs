pub mod contact;
pub mod media;
pub mod news;
pub mod page;
pub mod pagination;
pub mod program;
pub mod setting;
pub mod staff;
pub mod status;
pub mod user;
