pub mod task;

pub use task::{
    parse_due_date, sort_by_due_date, CreateTaskRequest, DeleteCompletedResponse, DeleteTaskQuery,
    ListTasksQuery, Task, UpdateTaskRequest,
};
