pub mod user;
pub mod work_interval;
