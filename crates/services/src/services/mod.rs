pub mod catalog;
pub mod config;
pub mod household;
pub mod identity;
pub mod notification;
pub mod watering;
