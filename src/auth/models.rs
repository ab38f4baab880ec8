//! Authentication Models
//! Mission: Define secure user and authentication data structures

use serde::{Deserialize, Serialize};

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub public_id: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub admin: bool,
}

/// Identity resolved by the request guard, attached to protected requests.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub public_id: String,
    pub name: String,
    pub admin: bool,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            public_id: user.public_id,
            name: user.name,
            admin: user.admin,
        }
    }
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub public_id: String, // externally visible user identity
    pub exp: usize,        // expiration timestamp
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: usize, // seconds until expiration
}

/// User response (sanitized)
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub public_id: String,
    pub name: String,
    pub admin: bool,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            public_id: user.public_id.clone(),
            name: user.name.clone(),
            admin: user.admin,
        }
    }
}

/// Signup request body
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub password: String,
}

/// Admin update of a user's name and role
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub admin: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: 1,
            public_id: "pid-1".to_string(),
            name: "alice".to_string(),
            password_hash: "supersecret".to_string(),
            admin: false,
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("supersecret"));
        assert!(json.contains("alice"));
    }

    #[test]
    fn test_user_response_is_sanitized() {
        let user = User {
            id: 7,
            public_id: "pid-7".to_string(),
            name: "bob".to_string(),
            password_hash: "hash123".to_string(),
            admin: true,
        };

        let response = UserResponse::from_user(&user);
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("hash123"));
        assert_eq!(response.public_id, "pid-7");
        assert!(response.admin);
    }

    #[test]
    fn test_current_user_from_user() {
        let user = User {
            id: 3,
            public_id: "pid-3".to_string(),
            name: "carol".to_string(),
            password_hash: "hash".to_string(),
            admin: false,
        };

        let current = CurrentUser::from(user);
        assert_eq!(current.id, 3);
        assert_eq!(current.name, "carol");
        assert!(!current.admin);
    }
}
