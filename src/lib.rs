//! agent-chat: a terminal chat client for remote agents.
//!
//! The client speaks two transports: A2A JSON-RPC with SSE streaming, and a
//! SLIM pub/sub gateway. Both yield the same decoded event type, which the
//! `stream` module reduces into a live dashboard and one clean final answer.
//!
//! # Quick start
//!
//! ```no_run
//! use agent_chat::session::{AgentProfile, Session};
//! use agent_chat::stream::run_turn;
//! use agent_chat::transport::A2aClient;
//! use agent_chat::tui::Renderer;
//! use agent_chat::ui::display::Display;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let client = A2aClient::new("http://localhost:8000", None, Duration::from_secs(300));
//! let card = client.fetch_agent_card().await.unwrap();
//! let session = Session::new(AgentProfile::from_card(&card), "a2a", None);
//! let mut display = Display::new(Arc::new(Renderer::new(true)));
//! let message = session.message("What can you do?");
//! let answer = run_turn(&client, &mut display, &message, &session.agent_name())
//!     .await
//!     .unwrap();
//! println!("{}", answer.content);
//! # }
//! ```

pub mod config;
pub mod error;
pub mod repl;
pub mod session;
pub mod stream;
#[cfg(test)]
pub mod testsupport;
pub mod textutil;
pub mod transport;
pub mod tui;
pub mod types;
pub mod ui;
