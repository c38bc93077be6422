use actix_web::{get, post, web, HttpRequest, HttpResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use serde::Deserialize;
use validator::Validate;

use crate::middleware::Identity;
use crate::models::{
    comments::Entity as Comments,
    dto::{CommentView, CurrentUser, HomePage},
    movies::{self, Entity as Movies, ActiveModel as MovieActiveModel},
    users::Entity as Users,
};
use crate::utils::{flash, gravatar};

// DTO du formulaire d'ajout : tous les champs requis, aucune autre validation
// (la note est stockée telle quelle, sans bornage)
#[derive(Deserialize, Validate)]
pub struct AddMovieForm {
    #[validate(length(min = 1))]
    pub title: String,
    pub release_date: i32,
    pub rating: f64,
    #[validate(length(min = 1))]
    pub review: String,
    #[validate(length(min = 1))]
    pub overview: String,
    #[validate(length(min = 1))]
    pub img_url: String,
}

// Seuls rating et review sont éditables, le reste est figé à la création
#[derive(Deserialize)]
pub struct EditMovieForm {
    pub id: i32,
    pub rating: f64,
    pub review: String,
}

#[derive(Deserialize)]
pub struct MovieIdQuery {
    pub id: i32,
}

/// GET / - Accueil : films triés par note décroissante + fil de commentaires (PUBLIC)
#[get("/")]
pub async fn home(
    req: HttpRequest,
    identity: Identity,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Films par note décroissante (égalités laissées à l'ordre du store)
    let all_movies = match Movies::find()
        .order_by_desc(movies::Column::Rating)
        .all(db.get_ref())
        .await
    {
        Ok(all_movies) => all_movies,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    // 2. Commentaires joints à leur auteur (nom + gravatar)
    let rows = match Comments::find().find_also_related(Users).all(db.get_ref()).await {
        Ok(rows) => rows,
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    let comment_feed: Vec<CommentView> = rows
        .into_iter()
        .map(|(comment, author)| {
            // La FK garantit l'auteur ; le repli ne sert qu'aux jeux de données bancals
            let (author_name, avatar_url) = match author {
                Some(user) => (user.name, gravatar::gravatar_url(&user.email, 100)),
                None => ("Unknown".to_string(), String::new()),
            };
            CommentView {
                id: comment.id,
                text: comment.text,
                author_id: comment.author_id,
                author_name,
                avatar_url,
            }
        })
        .collect();

    // 3. Identité courante + flash en attente
    let current_user = identity.user().map(|u| CurrentUser {
        user_id: u.user_id,
        name: u.name.clone(),
    });

    let page = HomePage {
        movies: all_movies,
        comments: comment_feed,
        is_admin: identity.is_admin(),
        current_user,
        flash: flash::peek_flash(&req),
    };

    HttpResponse::Ok()
        .cookie(flash::clear_flash_cookie())
        .json(page)
}

/// GET /add - Formulaire d'ajout (ADMIN)
#[get("/add")]
pub async fn add_page(identity: Identity) -> HttpResponse {
    if !identity.is_admin() {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Admin only"
        }));
    }
    // Le formulaire est rendu côté client, la route ne fait qu'autoriser
    HttpResponse::Ok().json(serde_json::json!({}))
}

/// POST /add - Créer un film (ADMIN)
#[post("/add")]
pub async fn add(
    identity: Identity,
    form: web::Form<AddMovieForm>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Garde d'autorisation explicite, avant tout accès au store
    if !identity.is_admin() {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Admin only"
        }));
    }

    // 2. Champs requis
    if form.validate().is_err() {
        return flash::redirect_with_flash("/add", "All fields are required.");
    }

    // 3. Titre déjà pris ?
    match Movies::find()
        .filter(movies::Column::Title.eq(&form.title))
        .one(db.get_ref())
        .await
    {
        Ok(Some(_)) => {
            return flash::redirect_with_flash("/add", "A movie with that title already exists.");
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
        _ => {}
    }

    // 4. Insert ; en cas de course, la contrainte unique de la BD tranche
    let new_movie = MovieActiveModel {
        title: Set(form.title.clone()),
        release_date: Set(form.release_date),
        rating: Set(form.rating),
        review: Set(form.review.clone()),
        overview: Set(form.overview.clone()),
        img_url: Set(form.img_url.clone()),
        ..Default::default()
    };

    match new_movie.insert(db.get_ref()).await {
        Ok(_) => flash::redirect("/"),
        Err(e) => match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                flash::redirect_with_flash("/add", "A movie with that title already exists.")
            }
            _ => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Failed to create movie: {}", e)
            })),
        },
    }
}

/// GET /edit?id= - Film à pré-remplir dans le formulaire d'édition (ADMIN)
#[get("/edit")]
pub async fn edit_page(
    identity: Identity,
    query: web::Query<MovieIdQuery>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if !identity.is_admin() {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Admin only"
        }));
    }

    match Movies::find_by_id(query.id).one(db.get_ref()).await {
        Ok(Some(movie)) => HttpResponse::Ok().json(movie),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Movie not found"
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {}", e)
        })),
    }
}

/// POST /edit - Modifier note et critique, le reste est immuable (ADMIN)
#[post("/edit")]
pub async fn edit(
    identity: Identity,
    form: web::Form<EditMovieForm>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    // 1. Garde d'autorisation explicite
    if !identity.is_admin() {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Admin only"
        }));
    }

    // 2. Id inconnu : contrat NotFound explicite
    let movie = match Movies::find_by_id(form.id).one(db.get_ref()).await {
        Ok(Some(movie)) => movie,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Movie not found"
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {}", e)
            }));
        }
    };

    // 3. Ne toucher qu'à rating et review
    let mut movie: MovieActiveModel = movie.into();
    movie.rating = Set(form.rating);
    movie.review = Set(form.review.clone());

    match movie.update(db.get_ref()).await {
        Ok(_) => flash::redirect("/"),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to update movie: {}", e)
        })),
    }
}

/// GET /delete?id= - Supprimer un film (ADMIN)
#[get("/delete")]
pub async fn delete(
    identity: Identity,
    query: web::Query<MovieIdQuery>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if !identity.is_admin() {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Admin only"
        }));
    }

    match Movies::delete_by_id(query.id).exec(db.get_ref()).await {
        // 0 ligne supprimée : id inconnu, contrat NotFound explicite
        Ok(result) if result.rows_affected == 0 => {
            HttpResponse::NotFound().json(serde_json::json!({
                "error": "Movie not found"
            }))
        }
        Ok(_) => flash::redirect("/"),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to delete movie: {}", e)
        })),
    }
}

pub fn movie_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home)
        .service(add_page)
        .service(add)
        .service(edit_page)
        .service(edit)
        .service(delete);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use crate::middleware::{ADMIN_USER_ID, SESSION_COOKIE};
    use crate::models::{comments, users};
    use crate::utils::jwt;

    fn movie(id: i32, title: &str, rating: f64) -> movies::Model {
        movies::Model {
            id,
            title: title.to_string(),
            release_date: 1999,
            rating,
            review: "review".to_string(),
            overview: "overview".to_string(),
            img_url: "https://img.example/poster.jpg".to_string(),
        }
    }

    fn admin_cookie() -> Cookie<'static> {
        let token = jwt::generate_token(ADMIN_USER_ID, "Admin").unwrap();
        Cookie::new(SESSION_COOKIE, token)
    }

    fn add_form() -> [(&'static str, &'static str); 6] {
        [
            ("title", "M1"),
            ("release_date", "1999"),
            ("rating", "7.5"),
            ("review", "solid"),
            ("overview", "a movie"),
            ("img_url", "https://img.example/m1.jpg"),
        ]
    }

    #[actix_web::test]
    async fn test_home_returns_movies_and_comment_feed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![movie(1, "Best", 9.0), movie(2, "Good", 7.5)]])
            .append_query_results([vec![(
                comments::Model {
                    id: 1,
                    text: "Nice list!".to_string(),
                    author_id: 1,
                },
                users::Model {
                    id: 1,
                    email: "a@x.com".to_string(),
                    password_hash: "hash".to_string(),
                    name: "Ann".to_string(),
                },
            )]])
            .into_connection();
        let app = test::init_service(App::new().app_data(web::Data::new(db)).service(home)).await;

        let req = test::TestRequest::get().uri("/").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["movies"][0]["rating"], 9.0);
        assert_eq!(body["movies"][1]["rating"], 7.5);
        assert_eq!(body["comments"][0]["author_name"], "Ann");
        assert!(body["comments"][0]["avatar_url"]
            .as_str()
            .unwrap()
            .starts_with("https://www.gravatar.com/avatar/"));
        assert_eq!(body["is_admin"], false);
        assert_eq!(body["current_user"], serde_json::Value::Null);
    }

    #[actix_web::test]
    async fn test_add_anonymous_is_forbidden() {
        // Aucun résultat préparé : toute requête BD ferait échouer le test en 500
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = test::init_service(App::new().app_data(web::Data::new(db)).service(add)).await;

        let req = test::TestRequest::post()
            .uri("/add")
            .set_form(add_form())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_add_non_admin_is_forbidden() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = test::init_service(App::new().app_data(web::Data::new(db)).service(add)).await;

        let token = jwt::generate_token(2, "Bob").unwrap();
        let req = test::TestRequest::post()
            .uri("/add")
            .cookie(Cookie::new(SESSION_COOKIE, token))
            .set_form(add_form())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_admin_add_inserts_and_redirects() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<movies::Model>::new()]) // titre libre
            .append_query_results([vec![movie(1, "M1", 7.5)]]) // INSERT .. RETURNING
            .into_connection();
        let app = test::init_service(App::new().app_data(web::Data::new(db)).service(add)).await;

        let req = test::TestRequest::post()
            .uri("/add")
            .cookie(admin_cookie())
            .set_form(add_form())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
    }

    #[actix_web::test]
    async fn test_add_duplicate_title_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![movie(1, "M1", 7.5)]]) // titre déjà pris
            .into_connection();
        let app = test::init_service(App::new().app_data(web::Data::new(db)).service(add)).await;

        let req = test::TestRequest::post()
            .uri("/add")
            .cookie(admin_cookie())
            .set_form(add_form())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/add");
    }

    #[actix_web::test]
    async fn test_edit_unknown_id_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<movies::Model>::new()])
            .into_connection();
        let app = test::init_service(App::new().app_data(web::Data::new(db)).service(edit)).await;

        let req = test::TestRequest::post()
            .uri("/edit")
            .cookie(admin_cookie())
            .set_form([("id", "99"), ("rating", "9.0"), ("review", "great")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_edit_updates_rating_and_review() {
        let updated = movies::Model {
            rating: 9.0,
            review: "great".to_string(),
            ..movie(1, "M1", 7.5)
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![movie(1, "M1", 7.5)]])
            .append_query_results([vec![updated]]) // UPDATE .. RETURNING
            .into_connection();
        let app = test::init_service(App::new().app_data(web::Data::new(db)).service(edit)).await;

        let req = test::TestRequest::post()
            .uri("/edit")
            .cookie(admin_cookie())
            .set_form([("id", "1"), ("rating", "9.0"), ("review", "great")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
    }

    #[actix_web::test]
    async fn test_delete_unknown_id_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let app =
            test::init_service(App::new().app_data(web::Data::new(db)).service(delete)).await;

        let req = test::TestRequest::get()
            .uri("/delete?id=99")
            .cookie(admin_cookie())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_delete_redirects_home() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let app =
            test::init_service(App::new().app_data(web::Data::new(db)).service(delete)).await;

        let req = test::TestRequest::get()
            .uri("/delete?id=1")
            .cookie(admin_cookie())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
    }

    #[actix_web::test]
    async fn test_delete_non_admin_is_forbidden() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app =
            test::init_service(App::new().app_data(web::Data::new(db)).service(delete)).await;

        let token = jwt::generate_token(2, "Bob").unwrap();
        let req = test::TestRequest::get()
            .uri("/delete?id=1")
            .cookie(Cookie::new(SESSION_COOKIE, token))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
