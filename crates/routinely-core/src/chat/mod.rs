//! Chat session with the remote routine assistant.
//!
//! - `ChatProvider`: port for the remote chat-completion endpoint
//! - `prompt`: seed transcript construction from a selection
//! - `ChatSession`: transcript + Idle/AwaitingResponse/Error state machine

pub mod prompt;
pub mod provider;
pub mod session;
