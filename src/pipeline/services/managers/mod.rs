pub mod session_recorder;
pub mod session_store;

pub use session_recorder::SessionRecorder;
pub use session_store::{InMemorySessionStore, SessionStore, SessionStoreStats};
