// SQL shared by every backend. Placeholders use the `$N` form, which both
// PostgreSQL and SQLite accept.

pub const SCHEMA_TASKS_POSTGRES: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id BIGSERIAL PRIMARY KEY,
    text TEXT NOT NULL,
    due_date TIMESTAMPTZ,
    completed BOOLEAN NOT NULL DEFAULT FALSE
)";

// AUTOINCREMENT keeps SQLite from handing out the id of a deleted row again.
pub const SCHEMA_TASKS_SQLITE: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    due_date DATETIME,
    completed BOOLEAN NOT NULL DEFAULT FALSE
)";

pub const SELECT_TASKS: &str = "SELECT id, text, due_date, completed FROM tasks ORDER BY id ASC";

pub const INSERT_TASK: &str = "INSERT INTO tasks (text, due_date) VALUES ($1, $2)
    RETURNING id, text, due_date, completed";

pub const UPDATE_TASK_FIELDS: &str = "UPDATE tasks SET text = $1, due_date = $2 WHERE id = $3
    RETURNING id, text, due_date, completed";

pub const UPDATE_TASK_COMPLETION: &str = "UPDATE tasks SET completed = $1 WHERE id = $2
    RETURNING id, text, due_date, completed";

pub const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = $1
    RETURNING id, text, due_date, completed";

pub const DELETE_COMPLETED_TASKS: &str = "DELETE FROM tasks WHERE completed = TRUE
    RETURNING id, text, due_date, completed";

pub const DELETE_ALL_TASKS: &str = "DELETE FROM tasks RETURNING id, text, due_date, completed";
