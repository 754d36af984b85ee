pub mod edit;
pub mod session;

pub use edit::EditError;
pub use session::{DraftError, DraftSession, DraftState};
