//! Wire types for the posts backend.
//!
//! Field names follow the backend's camelCase JSON.

use serde::{Deserialize, Serialize};

/// Author of a post or comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: u64,
    pub name: String,
    pub username: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub title: String,
    /// HTML body as stored by the backend
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub author: Author,
    pub created_at: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
}

impl Post {
    /// Image URL, treating an empty string as absent.
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub content: String,
    pub created_at: String,
    pub author: Author,
}

/// One page of a paginated listing. `page` is 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub last_page: u32,
}

pub type PaginatedPosts = Paginated<Post>;

/// Paging parameters; unset fields take the endpoint's default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl ListParams {
    #[must_use]
    pub const fn new(limit: u32, page: u32) -> Self {
        Self {
            limit: Some(limit),
            page: Some(page),
        }
    }

    /// Concrete `(limit, page)` with the given default limit and page 1.
    #[must_use]
    pub fn resolve(self, default_limit: u32) -> (u32, u32) {
        (
            self.limit.unwrap_or(default_limit),
            self.page.unwrap_or(1),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(flatten)]
    pub list: ListParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterDto {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: u64,
    pub email: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginDto {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// The authenticated user's record from `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<u64>,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_deserialize() {
        let json = r#"{
            "id": 7,
            "title": "Hello",
            "content": "<p>Hi</p>",
            "tags": ["rust", "web"],
            "imageUrl": null,
            "author": {"id": 1, "name": "Ana", "username": "ana", "headline": "Writer", "avatarUrl": null},
            "createdAt": "2025-05-27T10:00:00.000Z",
            "likes": 20,
            "comments": 4
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 7);
        assert_eq!(post.tags, vec!["rust", "web"]);
        assert!(post.image().is_none());
        assert_eq!(post.author.name, "Ana");
        assert_eq!(post.comments, 4);
    }

    #[test]
    fn test_empty_image_is_absent() {
        let json = r#"{"id":1,"title":"t","content":"","imageUrl":"",
            "author":{"id":1,"name":"a","username":"a"},"createdAt":"x"}"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert!(post.image().is_none());
        assert!(post.tags.is_empty());
    }

    #[test]
    fn test_paginated_last_page_field() {
        let json = r#"{"data":[],"total":0,"page":1,"lastPage":1}"#;
        let page: PaginatedPosts = serde_json::from_str(json).unwrap();
        assert_eq!(page.last_page, 1);
    }

    #[test]
    fn test_list_params_resolve() {
        assert_eq!(ListParams::default().resolve(5), (5, 1));
        assert_eq!(ListParams::new(3, 2).resolve(5), (3, 2));
    }

    #[test]
    fn test_register_dto_omits_username() {
        let dto = RegisterDto {
            name: "Ana".to_string(),
            username: None,
            email: "ana@x.com".to_string(),
            password: "pw".to_string(),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("username").is_none());
    }
}
