use actix_web::{get, post, web, HttpRequest, HttpResponse, http::header};
use actix_web::cookie::Cookie;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr};
use serde::Deserialize;
use validator::Validate;

use crate::middleware::SESSION_COOKIE;
use crate::models::users::{Column as UserColumn, Entity as Users, ActiveModel as UserActiveModel};
use crate::utils::{flash, jwt, password};

// DTO pour l'inscription (le formulaire original n'exige que des champs non vides)
#[derive(Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[validate(length(min = 1))]
    pub name: String,
}

// DTO pour la connexion
#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Ouvre la session : cookie HttpOnly + redirection vers l'accueil
fn start_session(token: String) -> HttpResponse {
    let cookie = Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .finish();
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .cookie(cookie)
        .finish()
}

/// GET /register - Page d'inscription (PUBLIC)
#[get("/register")]
pub async fn register_page(req: HttpRequest) -> HttpResponse {
    let flash_message = flash::peek_flash(&req);
    HttpResponse::Ok()
        .cookie(flash::clear_flash_cookie())
        .json(serde_json::json!({ "flash": flash_message }))
}

/// POST /register - Créer un compte puis connecter immédiatement (PUBLIC)
#[post("/register")]
pub async fn register(
    form: web::Form<RegisterForm>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Champs requis
    if form.validate().is_err() {
        return flash::redirect_with_flash("/register", "All fields are required.");
    }

    // 2. Email déjà inscrit ?
    let existing_user = Users::find()
        .filter(UserColumn::Email.eq(&form.email))
        .one(db.get_ref())
        .await;

    match existing_user {
        Ok(Some(_)) => {
            return flash::redirect_with_flash(
                "/login",
                "You've already signed up with that email, log in instead!",
            );
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
        _ => {}
    }

    // 3. Hash du mot de passe
    let password_hash = match password::hash_password(&form.password) {
        Ok(hash) => hash,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to hash password: {}", e)
            }));
        }
    };

    // 4. Créer l'utilisateur ; en cas de course, la contrainte unique
    //    de la BD reste la source de vérité du doublon
    let new_user = UserActiveModel {
        email: Set(form.email.clone()),
        password_hash: Set(password_hash),
        name: Set(form.name.clone()),
        ..Default::default()
    };

    let user = match new_user.insert(db.get_ref()).await {
        Ok(user) => user,
        Err(e) => {
            return match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => flash::redirect_with_flash(
                    "/login",
                    "You've already signed up with that email, log in instead!",
                ),
                _ => HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": format!("Failed to create user: {}", e)
                })),
            };
        }
    };

    // 5. Connexion immédiate du nouveau compte
    match jwt::generate_token(user.id, &user.name) {
        Ok(token) => start_session(token),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to generate token: {}", e)
        })),
    }
}

/// GET /login - Page de connexion (PUBLIC)
#[get("/login")]
pub async fn login_page(req: HttpRequest) -> HttpResponse {
    let flash_message = flash::peek_flash(&req);
    HttpResponse::Ok()
        .cookie(flash::clear_flash_cookie())
        .json(serde_json::json!({ "flash": flash_message }))
}

/// POST /login - Se connecter (PUBLIC)
/// Email inconnu et mauvais mot de passe donnent deux messages distincts
#[post("/login")]
pub async fn login(
    form: web::Form<LoginForm>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Trouver l'utilisateur
    let user = Users::find()
        .filter(UserColumn::Email.eq(&form.email))
        .one(db.get_ref())
        .await;

    let user = match user {
        Ok(Some(user)) => user,
        Ok(None) => {
            return flash::redirect_with_flash(
                "/login",
                "That email does not exist, please try again.",
            );
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    // 2. Vérifier le mot de passe
    let is_valid = match password::verify_password(&form.password, &user.password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Password verification error: {}", e)
            }));
        }
    };

    if !is_valid {
        return flash::redirect_with_flash("/login", "Password incorrect, please try again.");
    }

    // 3. Ouvrir la session
    match jwt::generate_token(user.id, &user.name) {
        Ok(token) => start_session(token),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to generate token: {}", e)
        })),
    }
}

/// GET /logout - Fermer la session, inconditionnel (PUBLIC)
#[get("/logout")]
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .finish();
    cookie.make_removal();

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .cookie(cookie)
        .finish()
}

pub fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register_page)
        .service(register)
        .service(login_page)
        .service(login)
        .service(logout);
}
