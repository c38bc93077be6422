use actix_web::{dev::Payload, Error, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::utils::jwt;

/// L'administrateur est le tout premier inscrit (id 1), pas de colonne rôle
pub const ADMIN_USER_ID: i32 = 1;

/// Cookie HttpOnly qui transporte le token de session
pub const SESSION_COOKIE: &str = "session";

/// Infos de l'utilisateur authentifié, relues du token de session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    pub name: String,
}

/// Identité de la requête courante
/// Extracteur infaillible : une requête sans session valide est anonyme,
/// chaque handler décide ensuite (redirection douce, 403, no-op)
#[derive(Debug, Clone)]
pub enum Identity {
    Anonymous,
    Authenticated(AuthUser),
}

impl Identity {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            Identity::Authenticated(user) => Some(user),
            Identity::Anonymous => None,
        }
    }

    /// Garde d'autorisation des opérations sur le catalogue
    pub fn is_admin(&self) -> bool {
        matches!(self, Identity::Authenticated(user) if user.user_id == ADMIN_USER_ID)
    }
}

impl FromRequest for Identity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // 1. Cookie de session, sinon header "Authorization: Bearer <token>"
        let token = req
            .cookie(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .or_else(|| {
                req.headers()
                    .get("Authorization")
                    .and_then(|h| h.to_str().ok())
                    .and_then(|s| s.strip_prefix("Bearer "))
                    .map(|s| s.to_string())
            });

        // 2. Token absent, invalide ou expiré => anonyme, jamais une erreur
        let identity = match token {
            Some(token) => match jwt::verify_token(&token) {
                Ok(claims) => Identity::Authenticated(AuthUser {
                    user_id: claims.sub,
                    name: claims.name,
                }),
                Err(_) => Identity::Anonymous,
            },
            None => Identity::Anonymous,
        };

        ready(Ok(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_no_session_is_anonymous() {
        let req = TestRequest::default().to_http_request();
        let identity = Identity::extract(&req).await.unwrap();
        assert!(identity.user().is_none());
        assert!(!identity.is_admin());
    }

    #[actix_web::test]
    async fn test_garbage_token_is_anonymous() {
        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, "not.a.token"))
            .to_http_request();
        let identity = Identity::extract(&req).await.unwrap();
        assert!(identity.user().is_none());
    }

    #[actix_web::test]
    async fn test_first_user_is_admin() {
        let token = jwt::generate_token(ADMIN_USER_ID, "Ann").unwrap();
        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, token))
            .to_http_request();
        let identity = Identity::extract(&req).await.unwrap();
        assert!(identity.is_admin());
        assert_eq!(identity.user().unwrap().name, "Ann");
    }

    #[actix_web::test]
    async fn test_other_user_is_not_admin() {
        let token = jwt::generate_token(2, "Bob").unwrap();
        let req = TestRequest::default()
            .cookie(Cookie::new(SESSION_COOKIE, token))
            .to_http_request();
        let identity = Identity::extract(&req).await.unwrap();
        assert!(identity.user().is_some());
        assert!(!identity.is_admin());
    }
}
