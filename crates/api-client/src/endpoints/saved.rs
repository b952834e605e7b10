//! Saved recipes of the signed-in user

use crate::client::RecipeClient;
use crate::error::ApiResult;
use crate::payload::Payload;
use crate::request::Request;
use serde_json::json;

/// Saved collection path
const SAVED_PATH: &str = "/users/me/saved";

/// Saved recipes API interface
#[derive(Clone)]
pub struct SavedApi {
    client: RecipeClient,
}

impl SavedApi {
    /// Create a new saved recipes API interface
    pub(crate) fn new(client: RecipeClient) -> Self {
        Self { client }
    }

    /// List saved recipes
    ///
    /// GET /users/me/saved
    pub async fn list(&self) -> ApiResult<Payload> {
        self.client.send(Request::get(SAVED_PATH)).await
    }

    /// Save a recipe
    ///
    /// POST /users/me/saved `{ "recipe_id": <id> }`
    pub async fn save(&self, recipe_id: &str) -> ApiResult<Payload> {
        self.client.send(save_request(recipe_id)).await
    }

    /// Remove a recipe from the collection
    ///
    /// DELETE /users/me/saved/<id>
    pub async fn unsave(&self, recipe_id: &str) -> ApiResult<Payload> {
        self.client.send(unsave_request(recipe_id)).await
    }
}

fn save_request(recipe_id: &str) -> Request {
    Request::post(SAVED_PATH).with_body(json!({ "recipe_id": recipe_id }))
}

fn unsave_request(recipe_id: &str) -> Request {
    Request::delete(format!("{SAVED_PATH}/{}", urlencoding::encode(recipe_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::RouteTable;
    use reqwest::Method;

    #[test]
    fn test_save_request() {
        let req = save_request("42");
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, "/users/me/saved");
        assert_eq!(req.body, Some(json!({"recipe_id": "42"})));
    }

    #[test]
    fn test_unsave_request_encodes_id() {
        let req = unsave_request("a/b c");
        assert_eq!(req.method, Method::DELETE);
        assert_eq!(req.path, "/users/me/saved/a%2Fb%20c");
        assert!(req.body.is_none());
    }

    #[test]
    fn test_routes_are_protected() {
        let table = RouteTable::default();
        assert!(!table.is_public(SAVED_PATH));
        assert!(!table.is_public(&save_request("1").normalized_path()));
        assert!(!table.is_public(&unsave_request("1").normalized_path()));
    }
}
