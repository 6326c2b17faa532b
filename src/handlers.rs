use std::collections::BTreeMap;
use std::io::Read;
use std::sync::{Arc, Mutex, PoisonError};

use iron::headers::ContentType;
use iron::status::{self, Status};
use iron::{AfterMiddleware, Handler, IronError, IronResult, Request, Response};
use log::{error, info};
use mount::OriginalUrl;
use router::Router;
use rustc_serialize::json::{Json, ToJson};

use crate::database::PostStore;
use crate::error::{BlogError, DEFAULT_MESSAGE, INVALID_REQUEST_MESSAGE};
use crate::render;
use crate::schema::{self, FieldError};

/// Requests under this path prefix get JSON errors, everything else HTML.
pub const API_PREFIX: &str = "/api";

pub type SharedStore = Arc<Mutex<PostStore>>;

/// Lock the store. The store is append-only, so a lock poisoned by a
/// panicking handler still holds a consistent list and is recovered.
macro_rules! lock {
    ( $e:expr ) => {
        $e.lock().unwrap_or_else(PoisonError::into_inner)
    };
}

/// Get the raw value of a parameter in the URI.
/// An absent parameter comes back empty and fails id parsing downstream.
fn get_http_param(req: &Request, name: &str) -> String {
    req.extensions
        .get::<Router>()
        .and_then(|params| params.find(name))
        .unwrap_or("")
        .to_string()
}

fn post_id(req: &Request) -> Result<Option<u64>, BlogError> {
    schema::parse_post_id(&get_http_param(req, "id")).map_err(BlogError::Validation)
}

fn json_response(status: Status, body: &Json) -> Response {
    let mut response = Response::with((status, body.to_string()));
    response.headers.set(ContentType::json());
    response
}

fn html_response(status: Status, body: String) -> Response {
    let mut response = Response::with((status, body));
    response.headers.set(ContentType::html());
    response
}

pub struct Handlers {
    pub home: HomeHandler,
    pub post_page: PostPageHandler,
    pub list_posts: ListPostsHandler,
    pub create_post: CreatePostHandler,
    pub get_post: GetPostHandler,
}

impl Handlers {
    pub fn new(store: PostStore) -> Handlers {
        let store = Arc::new(Mutex::new(store));
        Handlers {
            home: HomeHandler::new(store.clone()),
            post_page: PostPageHandler::new(store.clone()),
            list_posts: ListPostsHandler::new(store.clone()),
            create_post: CreatePostHandler::new(store.clone()),
            get_post: GetPostHandler::new(store),
        }
    }
}

/// Renders the list page. Cloned to serve both `/` and `/posts`.
#[derive(Clone)]
pub struct HomeHandler {
    store: SharedStore,
}

impl HomeHandler {
    fn new(store: SharedStore) -> HomeHandler {
        HomeHandler { store: store }
    }
}

impl Handler for HomeHandler {
    fn handle(&self, _: &mut Request) -> IronResult<Response> {
        let page = render::home(lock!(self.store).list()).map_err(BlogError::from)?;
        Ok(html_response(status::Ok, page))
    }
}

pub struct PostPageHandler {
    store: SharedStore,
}

impl PostPageHandler {
    fn new(store: SharedStore) -> PostPageHandler {
        PostPageHandler { store: store }
    }
}

impl Handler for PostPageHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let id = post_id(req)?;
        let post = id
            .and_then(|id| lock!(self.store).get(id))
            .ok_or(BlogError::PostNotFound)?;
        let page = render::post(&post).map_err(BlogError::from)?;
        Ok(html_response(status::Ok, page))
    }
}

pub struct ListPostsHandler {
    store: SharedStore,
}

impl ListPostsHandler {
    fn new(store: SharedStore) -> ListPostsHandler {
        ListPostsHandler { store: store }
    }
}

impl Handler for ListPostsHandler {
    fn handle(&self, _: &mut Request) -> IronResult<Response> {
        let payload = lock!(self.store).list().to_json();
        Ok(json_response(status::Ok, &payload))
    }
}

pub struct CreatePostHandler {
    store: SharedStore,
}

impl CreatePostHandler {
    fn new(store: SharedStore) -> CreatePostHandler {
        CreatePostHandler { store: store }
    }
}

impl Handler for CreatePostHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let mut payload = Vec::new();
        req.body.read_to_end(&mut payload).map_err(BlogError::from)?;

        let new_post = schema::parse_new_post(&payload).map_err(BlogError::Validation)?;
        let post = lock!(self.store).create(new_post);
        info!("created post {} by {}", post.id(), post.author());

        Ok(json_response(status::Created, &post.to_json()))
    }
}

pub struct GetPostHandler {
    store: SharedStore,
}

impl GetPostHandler {
    fn new(store: SharedStore) -> GetPostHandler {
        GetPostHandler { store: store }
    }
}

impl Handler for GetPostHandler {
    fn handle(&self, req: &mut Request) -> IronResult<Response> {
        let id = post_id(req)?;
        let post = id
            .and_then(|id| lock!(self.store).get(id))
            .ok_or(BlogError::PostNotFound)?;
        Ok(json_response(status::Ok, &post.to_json()))
    }
}

/// What a failed request reports back to the client.
#[derive(Debug)]
enum Detail {
    Message(String),
    Errors(Vec<FieldError>),
}

/// Turns every error raised below it into a response: JSON
/// `{"detail": ...}` for paths under `API_PREFIX`, the HTML error page
/// for everything else.
pub struct ErrorResponder;

impl ErrorResponder {
    fn classify(err: &IronError) -> (Status, Detail) {
        match err.error.downcast_ref::<BlogError>() {
            Some(BlogError::Validation(errors)) => {
                (status::UnprocessableEntity, Detail::Errors(errors.clone()))
            }
            Some(blog_error) if blog_error.is_internal() => {
                error!("internal error: {}", blog_error);
                (blog_error.status(), Detail::Message(reason(blog_error.status())))
            }
            Some(blog_error) => (blog_error.status(), Detail::Message(blog_error.to_string())),
            None => {
                let status = err.response.status.unwrap_or(status::InternalServerError);
                (status, Detail::Message(reason(status)))
            }
        }
    }

    fn json(status: Status, detail: Detail) -> Response {
        let detail = match detail {
            Detail::Message(message) => message.to_json(),
            Detail::Errors(errors) => errors.to_json(),
        };
        let mut body = BTreeMap::new();
        body.insert("detail".to_string(), detail);
        json_response(status, &Json::Object(body))
    }

    fn html(status: Status, detail: Detail) -> Response {
        let message = match detail {
            Detail::Message(message) => message,
            Detail::Errors(_) => INVALID_REQUEST_MESSAGE.to_string(),
        };
        match render::error(status.to_u16(), &message) {
            Ok(page) => html_response(status, page),
            Err(err) => {
                error!("failed to render error page: {}", err);
                Response::with((status, message))
            }
        }
    }
}

impl AfterMiddleware for ErrorResponder {
    fn catch(&self, req: &mut Request, err: IronError) -> IronResult<Response> {
        if err.response.status.map_or(false, |status| status.is_redirection()) {
            return Ok(err.response);
        }

        let (status, detail) = ErrorResponder::classify(&err);
        if is_api_request(req) {
            Ok(ErrorResponder::json(status, detail))
        } else {
            Ok(ErrorResponder::html(status, detail))
        }
    }
}

fn reason(status: Status) -> String {
    status.canonical_reason().unwrap_or(DEFAULT_MESSAGE).to_string()
}

/// Checks the path as the client sent it, before `Mount` strips a prefix.
fn is_api_request(req: &Request) -> bool {
    let url = req.extensions.get::<OriginalUrl>().unwrap_or(&req.url);
    format!("/{}", url.path().join("/")).starts_with(API_PREFIX)
}
