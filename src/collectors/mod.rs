pub mod activity;
pub mod proc_tables;
pub mod sysfs;
