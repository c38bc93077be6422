//pour la réponse structurée de la page d'accueil
use serde::Serialize;

use super::movies;

// Payload complet de GET / : films triés + fil de commentaires + identité
#[derive(Debug, Serialize)]
pub struct HomePage {
    pub movies: Vec<movies::Model>,
    pub comments: Vec<CommentView>,
    pub current_user: Option<CurrentUser>,
    pub is_admin: bool,
    pub flash: Option<String>,
}

// Un commentaire joint à son auteur (nom + avatar gravatar)
#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: i32,
    pub text: String,
    pub author_id: i32,
    pub author_name: String,
    pub avatar_url: String,
}

#[derive(Debug, Serialize)]
pub struct CurrentUser {
    pub user_id: i32,
    pub name: String,
}
