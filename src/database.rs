use chrono::NaiveDate;
use crate::model::{NewPost, Post};

/// In-memory, append-only post storage.
///
/// Iteration order is insertion order. Nothing is persisted: a restart
/// brings the store back to whatever `main` seeds it with.
#[derive(Clone, Debug, Default)]
pub struct PostStore {
    posts: Vec<Post>,
}

impl PostStore {
    pub fn new() -> PostStore {
        PostStore { posts: vec![] }
    }

    /// The two posts every fresh process starts with.
    pub fn seeded() -> PostStore {
        let mut store = PostStore::new();
        store.insert(
            NewPost::new(
                "Lakshya Mittal",
                "FastAPI is Awesome",
                "This framework is really easy to use and super fast",
            ),
            label_date(20),
        );
        store.insert(
            NewPost::new(
                "Darshan Mittal",
                "Python is great for web development.",
                "Python is a great language for web dev, and FastAPI makes it even better.",
            ),
            label_date(21),
        );
        store
    }

    pub fn list(&self) -> &[Post] {
        &self.posts
    }

    pub fn get(&self, id: u64) -> Option<Post> {
        self.posts.iter().find(|post| post.id() == id).cloned()
    }

    /// Append a post dated with the fixed creation label.
    pub fn create(&mut self, new_post: NewPost) -> Post {
        self.insert(new_post, label_date(23))
    }

    fn insert(&mut self, new_post: NewPost, date_posted: NaiveDate) -> Post {
        let post = Post::new(self.next_id(), new_post, date_posted);
        self.posts.push(post.clone());
        post
    }

    fn next_id(&self) -> u64 {
        self.posts.iter().map(Post::id).max().map_or(1, |max| max + 1)
    }
}

// Date labels are fixed, not taken from the clock.
fn label_date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, day).unwrap_or_default()
}
