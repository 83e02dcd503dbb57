//! JWT claim structure for access tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Claims embedded in every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub username: String,
    pub email: String,
    /// `admin` or `user`
    pub role: String,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
}

impl Claims {
    /// The subject as a UUID, `None` if the token was minted with a foreign id.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            role: "user".to_string(),
            iat: 1234567800,
            exp: 1234567890,
        }
    }

    #[test]
    fn test_claims_serialize() {
        let serialized = serde_json::to_string(&sample("user-id-123")).unwrap();
        assert!(serialized.contains(r#""sub":"user-id-123""#));
        assert!(serialized.contains(r#""username":"alice""#));
        assert!(serialized.contains(r#""role":"user""#));
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"sub":"abc","username":"bob","email":"bob@test.com","role":"admin","iat":9999999900,"exp":9999999999}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.username, "bob");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp, 9999999999);
    }

    #[test]
    fn test_user_id() {
        let id = Uuid::new_v4();
        assert_eq!(sample(&id.to_string()).user_id(), Some(id));
        assert_eq!(sample("not-a-uuid").user_id(), None);
    }
}
