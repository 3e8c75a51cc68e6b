pub mod panic_handler;
pub mod request_id;
