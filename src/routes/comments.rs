use actix_web::{get, post, web, HttpResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use validator::Validate;

use crate::middleware::Identity;
use crate::models::comments::{self, Entity as Comments, ActiveModel as CommentActiveModel};
use crate::utils::flash;

// DTO du formulaire de commentaire (champ "comment" de l'éditeur riche)
#[derive(Deserialize, Validate)]
pub struct CommentForm {
    #[validate(length(min = 1))]
    pub comment: String,
}

#[derive(Deserialize)]
pub struct DeleteCommentQuery {
    pub id: Option<i32>,
}

/// POST / - Poster un commentaire (AUTHENTIFIÉ)
/// Anonyme : redirection douce vers le login, rien n'est persisté
#[post("/")]
pub async fn create_comment(
    identity: Identity,
    form: web::Form<CommentForm>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Identité requise
    let user = match identity.user() {
        Some(user) => user,
        None => {
            return flash::redirect_with_flash(
                "/login",
                "You need to login or register to comment.",
            );
        }
    };

    // 2. Champ requis
    if form.validate().is_err() {
        return flash::redirect_with_flash("/", "Comment cannot be empty.");
    }

    // 3. Toujours lié à l'appelant, jamais à un author_id soumis
    let new_comment = CommentActiveModel {
        text: Set(form.comment.clone()),
        author_id: Set(user.user_id),
        ..Default::default()
    };

    match new_comment.insert(db.get_ref()).await {
        Ok(_) => flash::redirect("/"),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to create comment: {}", e)
        })),
    }
}

/// GET /delete_comment - Supprimer un de ses commentaires (AUTHENTIFIÉ)
/// Avec ?id= : ce commentaire-là, seulement s'il appartient à l'appelant.
/// Sans id : le premier commentaire de l'appelant (comportement historique).
/// Anonyme ou rien à supprimer : no-op, on revient à l'accueil.
#[get("/delete_comment")]
pub async fn delete_comment(
    identity: Identity,
    query: web::Query<DeleteCommentQuery>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user = match identity.user() {
        Some(user) => user,
        None => return flash::redirect("/"),
    };

    match query.id {
        Some(comment_id) => {
            // Le filtre auteur fait partie du DELETE : le commentaire d'un
            // autre utilisateur est structurellement hors d'atteinte
            let result = Comments::delete_many()
                .filter(comments::Column::Id.eq(comment_id))
                .filter(comments::Column::AuthorId.eq(user.user_id))
                .exec(db.get_ref())
                .await;

            match result {
                Ok(_) => flash::redirect("/"),
                Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": format!("Failed to delete comment: {}", e)
                })),
            }
        }
        None => {
            // 1. Premier commentaire de l'appelant dans l'ordre du store
            let first = Comments::find()
                .filter(comments::Column::AuthorId.eq(user.user_id))
                .order_by_asc(comments::Column::Id)
                .one(db.get_ref())
                .await;

            match first {
                Ok(Some(comment)) => match comment.delete(db.get_ref()).await {
                    Ok(_) => flash::redirect("/"),
                    Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
                        "error": format!("Failed to delete comment: {}", e)
                    })),
                },
                Ok(None) => flash::redirect("/"),
                Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": format!("Database error: {}", e)
                })),
            }
        }
    }
}

pub fn comment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_comment).service(delete_comment);
}
