//! HTML pages, rendered from the askama templates in `templates/`.

use askama::Template;

use crate::model::Post;

/// Number of characters of a post title kept in the detail page title.
pub const TITLE_TRUNCATE_AT: usize = 50;

#[derive(Template)]
#[template(path = "home.html")]
struct HomePage<'a> {
    title: &'a str,
    posts: &'a [Post],
}

#[derive(Template)]
#[template(path = "post.html")]
struct PostPage<'a> {
    title: String,
    post: &'a Post,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPage<'a> {
    title: String,
    status_code: u16,
    message: &'a str,
}

pub fn home(posts: &[Post]) -> askama::Result<String> {
    HomePage {
        title: "Home",
        posts: posts,
    }
    .render()
}

pub fn post(post: &Post) -> askama::Result<String> {
    PostPage {
        title: page_title(post.title()),
        post: post,
    }
    .render()
}

pub fn error(status_code: u16, message: &str) -> askama::Result<String> {
    ErrorPage {
        title: status_code.to_string(),
        status_code: status_code,
        message: message,
    }
    .render()
}

/// The ellipsis is appended whether or not anything was cut.
pub fn page_title(title: &str) -> String {
    let mut truncated: String = title.chars().take(TITLE_TRUNCATE_AT).collect();
    truncated.push_str("...");
    truncated
}
