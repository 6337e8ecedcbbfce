pub mod delete;
pub mod dispatch;
pub mod download;
pub mod list;
pub mod status;
pub mod submit;
