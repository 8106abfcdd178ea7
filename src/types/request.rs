//! Request bodies for the create and update exchanges.

use serde::Serialize;

/// Body of `POST /api/todos`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CreateRecordBody<'a> {
    /// Task text exactly as entered.
    pub task: &'a str,
}

/// Body of `PUT /api/todos/{id}`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpdateRecordBody<'a> {
    /// Replacement task text.
    pub task: &'a str,
    /// Replacement completion flag.
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_body_carries_only_task() {
        let value = serde_json::to_value(CreateRecordBody { task: " buy milk " }).unwrap();
        assert_eq!(value, json!({"task": " buy milk "}));
    }

    #[test]
    fn update_body_carries_task_and_flag() {
        let value = serde_json::to_value(UpdateRecordBody {
            task: "buy bread",
            completed: true,
        })
        .unwrap();
        assert_eq!(value, json!({"task": "buy bread", "completed": true}));
    }
}
