use std::collections::BTreeMap;

use chrono::NaiveDate;
use rustc_serialize::json::{Json, ToJson};

/// Format used for the `date_posted` label, e.g. `April 20, 2025`.
const DATE_LABEL_FORMAT: &str = "%B %-d, %Y";

#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    id: u64,
    author: String,
    title: String,
    content: String,
    date_posted: NaiveDate,
}

impl Post {
    pub fn new(id: u64, new_post: NewPost, date_posted: NaiveDate) -> Post {
        Post {
            id: id,
            author: new_post.author,
            title: new_post.title,
            content: new_post.content,
            date_posted: date_posted,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn date_posted(&self) -> String {
        self.date_posted.format(DATE_LABEL_FORMAT).to_string()
    }
}

impl ToJson for Post {
    fn to_json(&self) -> Json {
        let mut object = BTreeMap::new();
        object.insert("id".to_string(), Json::U64(self.id));
        object.insert("author".to_string(), self.author.to_json());
        object.insert("title".to_string(), self.title.to_json());
        object.insert("content".to_string(), self.content.to_json());
        object.insert("date_posted".to_string(), self.date_posted().to_json());
        Json::Object(object)
    }
}

/// The fields a client supplies when creating a post.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPost {
    pub author: String,
    pub title: String,
    pub content: String,
}

impl NewPost {
    pub fn new(author: &str, title: &str, content: &str) -> NewPost {
        NewPost {
            author: author.to_string(),
            title: title.to_string(),
            content: content.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(day: u32) -> Post {
        Post::new(
            7,
            NewPost::new("Mathieu", "First post", "This is the first post ever"),
            NaiveDate::from_ymd_opt(2025, 4, day).unwrap(),
        )
    }

    #[test]
    fn date_label_is_not_zero_padded() {
        assert_eq!(post(3).date_posted(), "April 3, 2025");
        assert_eq!(post(20).date_posted(), "April 20, 2025");
    }

    #[test]
    fn json_carries_every_response_field() {
        let json = post(23).to_json();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 5);
        assert_eq!(object["id"].as_u64(), Some(7));
        assert_eq!(object["author"].as_string(), Some("Mathieu"));
        assert_eq!(object["title"].as_string(), Some("First post"));
        assert_eq!(
            object["content"].as_string(),
            Some("This is the first post ever")
        );
        assert_eq!(object["date_posted"].as_string(), Some("April 23, 2025"));
    }
}
