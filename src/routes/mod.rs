pub mod auth;
pub mod movies;
pub mod comments;

use actix_web::web;

// Routes plates à la racine, comme l'application d'origine (pas de scope /api)
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(movies::movie_routes)
        .configure(comments::comment_routes)
        .configure(auth::auth_routes);
}
