pub mod dispatcher;
pub mod llm;
pub mod registry;
pub mod tools;

pub use dispatcher::{DispatchError, DispatcherOptions, QueryDispatcher};
pub use registry::{Agent, AgentRegistry};
