//! Certificate-issuance dialog.
//!
//! - `state` - per-chat session and its states
//! - `command` - classification of inbound text
//! - `validation` - digit-only input rules
//! - `expiry` - clock and validity-date arithmetic
//! - `messages` - fixed reply strings
//! - `controller` - the state machine itself

pub mod command;
pub mod controller;
pub mod expiry;
pub mod messages;
pub mod state;
pub mod validation;

pub use command::{Command, Inbound};
pub use controller::DialogController;
pub use expiry::{Clock, FixedClock, SystemClock};
pub use state::{Session, SessionState};
