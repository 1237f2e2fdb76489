pub mod auth;
pub mod contact;
pub mod media;
pub mod news;
pub mod pages;
pub mod programs;
pub mod respond;
pub mod settings;
pub mod staff;
