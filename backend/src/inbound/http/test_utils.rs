//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use super::state::{HttpState, Repositories};
use super::validation::{json_config, path_config};
use crate::outbound::memory::InMemoryBlogStore;
use crate::outbound::password::{BcryptPasswordHasher, MIN_COST};

/// Cookie session with a throwaway key and no `Secure` flag.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    session_middleware_with_key(Key::generate())
}

/// Cookie session signed with `key`, so cookies survive across app instances.
pub fn session_middleware_with_key(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Handler state over a fresh in-memory store, plus the store for seeding.
pub fn memory_state() -> (HttpState, Arc<InMemoryBlogStore>) {
    let store = Arc::new(InMemoryBlogStore::default());
    let state = HttpState::from_repositories(
        Repositories {
            users: store.clone(),
            profiles: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            likes: store.clone(),
            taxonomy: store.clone(),
        },
        Arc::new(BcryptPasswordHasher::with_cost(MIN_COST)),
    );
    (state, store)
}

/// The `/api/v1` scope over `state`, wired as in production.
pub async fn init_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    init_app_with_key(state, Key::generate()).await
}

/// As [`init_app`], with a caller-chosen session key.
pub async fn init_app_with_key(
    state: HttpState,
    key: Key,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .app_data(path_config())
            .service(
                web::scope("/api/v1")
                    .wrap(session_middleware_with_key(key))
                    .configure(super::configure_api),
            ),
    )
    .await
}

/// Register `username` and return a logged-in session cookie.
pub async fn sign_in<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let credentials = json!({"username": username, "password": "correct horse"});
    let registered = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(&credentials)
            .to_request(),
    )
    .await;
    assert_eq!(registered.status(), StatusCode::CREATED);

    let login = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(&credentials)
            .to_request(),
    )
    .await;
    assert_eq!(login.status(), StatusCode::OK);
    session_cookie(&login)
}

/// Send `req` and decode the status and JSON body.
pub async fn call_json<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, req).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

/// Create a post as the holder of `cookie` and return its id.
pub async fn create_post<S, B>(app: &S, cookie: &Cookie<'static>, title: &str) -> i64
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = call_json(
        app,
        test::TestRequest::post()
            .uri("/api/v1/posts")
            .cookie(cookie.clone())
            .set_json(json!({"title": title, "content": "Body text"}))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().expect("post id")
}
