pub mod frame;

pub use frame::{Frame, decode_base64_payload};
