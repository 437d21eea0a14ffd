#![allow(dead_code)]

pub mod app;
pub mod multipart;

pub use app::{ADMIN_TOKEN, TestApp, make_test_app, make_test_app_with_store};
pub use multipart::MultipartBody;
