pub mod common;
pub mod flash;
pub mod handler;
pub mod model_and_view;
pub mod request;
pub mod response;
pub mod session;
