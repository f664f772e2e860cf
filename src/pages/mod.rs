pub mod chud;
pub mod home;
pub mod not_found;
