//! Shared harness for the HTTP integration suites.
//!
//! Builds the application the way the server binary does, over a fresh
//! in-memory store, with a cookie session that works over plain HTTP.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use backend::Trace;
use backend::inbound::http::configure_api;
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::{HttpState, Repositories};
use backend::inbound::http::validation::{json_config, path_config};
use backend::outbound::memory::InMemoryBlogStore;
use backend::outbound::password::{BcryptPasswordHasher, MIN_COST};
use serde_json::{Value, json};

pub const PASSWORD: &str = "correct horse";

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

/// The full application: trace middleware, probes and the session-wrapped API.
pub async fn init_app(
    state: HttpState,
    health: web::Data<HealthState>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    init_app_with_key(state, health, Key::generate()).await
}

/// As [`init_app`], signing session cookies with `key`.
pub async fn init_app_with_key(
    state: HttpState,
    health: web::Data<HealthState>,
    key: Key,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    test::init_service(
        App::new()
            .app_data(health)
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .app_data(path_config())
            .wrap(Trace)
            .service(web::scope("/api/v1").wrap(session).configure(configure_api))
            .service(ready)
            .service(live),
    )
    .await
}

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

/// Register and log in `username`, returning the session cookie.
pub async fn sign_in<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let credentials = json!({"username": username, "password": PASSWORD});
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
    login
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

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
