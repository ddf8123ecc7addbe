//! Handlers not linked to a specific url

use ntex::web;

use crate::{consts, front::errors};

/// Liveness check
#[web::get("/health")]
async fn health() -> impl web::Responder {
    web::HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(consts::HEALTHY_MSG)
}

/// Return a [UrlNotFound](errors::UserError::UrlNotFound) error for urls not defined
pub async fn serve_not_found() -> Result<web::HttpResponse, web::Error> {
    Err(errors::UserError::UrlNotFound.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntex::{
        http,
        web::{App, test},
    };

    #[ntex::test]
    async fn test_health() {
        let app = test::init_service(App::new().service(health)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;

        assert_eq!(resp.status(), http::StatusCode::OK);
        assert_eq!(test::read_body(resp).await, consts::HEALTHY_MSG.as_bytes());
    }

    #[ntex::test]
    async fn test_unknown_url() {
        let app = test::init_service(
            App::new()
                .service(health)
                .default_service(web::route().to(serve_not_found)),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post().uri("/nowhere").to_request(),
        )
        .await;

        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);
    }
}
