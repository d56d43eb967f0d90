//! Agent execution state: message history, todo list, plan, ReAct cycles, and the
//! `ExecutionContext` that threads them (plus browser, LLM, and narrator handles) through a run.

pub mod execution_context;
pub mod message_log;
pub mod plan;
pub mod react_state;
pub mod todo_list;

pub use execution_context::ExecutionContext;
pub use message_log::MessageLog;
pub use plan::{Plan, PlanStep, PredefinedPlan};
pub use react_state::{Cycle, ReactState};
pub use todo_list::{TodoItem, TodoList};
