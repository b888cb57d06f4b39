//! # Weather Chat
//!
//! A chat agent with a single tool: a current-weather lookup.
//!
//! This library provides:
//! - An HTTP API and a small chat page for talking to the agent
//! - A tool-based agent loop with per-session conversation history
//! - An OpenAI-compatible chat-completions client
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Receive a message and a session id via the API
//! 2. Build context with system prompt, session history and available tools
//! 3. Call LLM, parse response, execute any tool calls
//! 4. Feed results back to LLM, repeat until it answers in plain text
//!
//! ## Example
//!
//! ```rust,ignore
//! use weather_chat::{agent::Agent, config::Config};
//!
//! let config = Config::from_env()?;
//! let agent = Agent::new(config);
//! let turn = agent.chat("demo", "What's the weather in Oslo?").await?;
//! println!("{}", turn.reply);
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod llm;
pub mod session;
pub mod tools;

pub use config::Config;
