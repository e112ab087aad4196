pub mod ai;
pub mod clients;
pub mod consultants;
pub mod finance;
pub mod health;
pub mod projects;
pub mod reports;
