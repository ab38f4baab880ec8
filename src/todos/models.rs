//! Todo Models
//! Mission: Define task records and their request/response shapes

use serde::{Deserialize, Serialize};

/// A single task owned by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub text: String,
    pub complete: bool,
    pub user_id: i64,
}

/// Body for POST /todos and PUT /todos/:id
#[derive(Debug, Deserialize)]
pub struct TodoRequest {
    pub text: String,
    pub complete: bool,
}
