//! Answer resolution and the conversational wrapper around it

pub mod context;
pub mod conversation;
pub mod resolver;

pub use context::{AgentContext, ResolverSettings, DEFAULT_NOT_FOUND_MESSAGE};
pub use conversation::{Answerer, ConversationAdapter, Message, Role};
pub use resolver::{Resolution, Resolver};
