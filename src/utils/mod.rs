pub mod data_types;
pub mod stream_body;
