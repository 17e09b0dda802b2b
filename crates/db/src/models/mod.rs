pub mod plant;
pub mod user;
pub mod user_plant;
