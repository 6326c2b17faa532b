//! Hermes: a small blog serving HTML pages and a JSON API over an
//! in-memory list of posts.

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod model;
pub mod render;
pub mod schema;

use iron::prelude::Chain;
use logger::Logger;
use mount::Mount;
use router::Router;
use staticfile::Static;

use crate::config::Config;
use crate::database::PostStore;
use crate::handlers::{ErrorResponder, Handlers};

/// Assemble the full middleware chain around `store`.
pub fn app(store: PostStore, config: &Config) -> Chain {
    let handlers = Handlers::new(store);

    let mut router = Router::new();
    router.get("/", handlers.home.clone(), "home");
    router.get("/posts", handlers.home, "posts");
    router.get("/posts/:id", handlers.post_page, "post_page");
    router.get("/api/posts", handlers.list_posts, "list_posts");
    router.post("/api/posts", handlers.create_post, "create_post");
    router.get("/api/posts/:id", handlers.get_post, "get_post");

    let mut mount = Mount::new();
    mount
        .mount("/static/", Static::new(config.static_dir.clone()))
        .mount("/", router);

    let (logger_before, logger_after) = Logger::new(None);

    let mut chain = Chain::new(mount);
    chain.link_before(logger_before); // Should be first!
    chain.link_after(ErrorResponder);
    chain.link_after(logger_after); // Should be last!
    chain
}
