pub mod task_handler;

pub use task_handler::TaskHandler;
