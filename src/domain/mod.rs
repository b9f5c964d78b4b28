//! Domain - Pure dialogue logic.
//!
//! No I/O lives here: intent taxonomy, the slot schema table, and the
//! per-conversation session record. The application layer drives these
//! against the ports.

pub mod intent;
pub mod session;
pub mod slots;

pub use intent::{Intent, IntentClassification, SmallTalkIntent, OUT_OF_SCOPE_REPLY};
pub use session::{ConversationSession, Stage};
pub use slots::{
    clarification_prompt, label_for, missing_slots, schema_for, SlotSchema, SlotSpec, SlotValues,
};
