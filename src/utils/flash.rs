use actix_web::{HttpRequest, HttpResponse, http::header};
use actix_web::cookie::Cookie;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

// Le message flash voyage dans un cookie, encodé base64 pour rester
// cookie-safe (espaces, apostrophes). Posé à la redirection, lu puis
// effacé par le GET de la page suivante.
pub const FLASH_COOKIE: &str = "flash";

/// Redirection 303 simple
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Redirection 303 avec message flash à afficher sur la page cible
pub fn redirect_with_flash(location: &str, message: &str) -> HttpResponse {
    let cookie = Cookie::build(FLASH_COOKIE, URL_SAFE_NO_PAD.encode(message))
        .path("/")
        .finish();
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(cookie)
        .finish()
}

/// Lit le message flash en attente, s'il y en a un
pub fn peek_flash(req: &HttpRequest) -> Option<String> {
    let cookie = req.cookie(FLASH_COOKIE)?;
    let bytes = URL_SAFE_NO_PAD.decode(cookie.value()).ok()?;
    String::from_utf8(bytes).ok()
}

/// Cookie d'effacement, à joindre à la réponse qui a consommé le flash
pub fn clear_flash_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(FLASH_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}
