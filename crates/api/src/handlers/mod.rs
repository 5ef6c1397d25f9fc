pub mod admin;
pub mod applications;
pub mod identity;
pub mod notification;
pub mod officers;
pub mod review;
