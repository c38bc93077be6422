use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use serde::{Deserialize, Serialize};
use chrono::{Utc, Duration};
use std::env;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,     // user_id
    pub name: String, // nom affiché
    pub exp: i64,     // expiration timestamp
}

/// Récupère la clé de signature des sessions depuis les variables d'environnement
fn get_secret_key() -> String {
    env::var("SECRET_KEY").unwrap_or_else(|_| {
        eprintln!("⚠️  WARNING: SECRET_KEY not found in .env, using default (INSECURE)");
        "default-insecure-key-change-this".to_string()
    })
}

/// Génère le token de session d'un utilisateur (validité 24h)
pub fn generate_token(user_id: i32, name: &str) -> Result<String, String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or("Failed to calculate expiration")?
        .timestamp();

    let claims = Claims {
        sub: user_id,
        name: name.to_string(),
        exp: expiration,
    };

    let secret = get_secret_key();

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
        .map_err(|e| format!("Failed to generate token: {}", e))
}

/// Vérifie et décode un token de session
pub fn verify_token(token: &str) -> Result<Claims, String> {
    let secret = get_secret_key();

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid token: {}", e))
}
