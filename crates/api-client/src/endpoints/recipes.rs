//! Recipe search and lookup
//!
//! Both routes are public: they never carry the session token.

use crate::client::RecipeClient;
use crate::error::ApiResult;
use crate::payload::Payload;
use crate::request::Request;

/// Recipes API interface
#[derive(Clone)]
pub struct RecipesApi {
    client: RecipeClient,
}

impl RecipesApi {
    /// Create a new recipes API interface
    pub(crate) fn new(client: RecipeClient) -> Self {
        Self { client }
    }

    /// Search recipes
    ///
    /// GET /recipes/search?q=<query>
    pub async fn search(&self, query: &str) -> ApiResult<Payload> {
        self.client.send(search_request(query)).await
    }

    /// Get a single recipe
    ///
    /// GET /recipes/<id>, with the id percent-encoded so it stays one segment
    pub async fn get_by_id(&self, id: &str) -> ApiResult<Payload> {
        self.client.send(recipe_request(id)).await
    }
}

fn search_request(query: &str) -> Request {
    Request::get(format!("/recipes/search?q={}", urlencoding::encode(query)))
}

fn recipe_request(id: &str) -> Request {
    Request::get(format!("/recipes/{}", urlencoding::encode(id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::RouteTable;
    use reqwest::Method;

    #[test]
    fn test_search_request_encodes_query() {
        let req = search_request("pasta");
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.path, "/recipes/search?q=pasta");

        let req = search_request("mac & cheese/2");
        assert_eq!(req.path, "/recipes/search?q=mac%20%26%20cheese%2F2");

        assert_eq!(search_request("").path, "/recipes/search?q=");
    }

    #[test]
    fn test_recipe_request() {
        let req = recipe_request("42");
        assert_eq!(req.path, "/recipes/42");
        assert!(req.body.is_none());
    }

    #[test]
    fn test_routes_are_public() {
        let table = RouteTable::default();
        assert!(table.is_public(&search_request("pasta").normalized_path()));
        assert!(table.is_public(&recipe_request("42").normalized_path()));
    }

    #[test]
    fn test_recipe_id_stays_one_public_segment() {
        let table = RouteTable::default();
        for (id, path) in [
            ("a/b", "/recipes/a%2Fb"),
            ("x?y=1", "/recipes/x%3Fy%3D1"),
            ("z#frag", "/recipes/z%23frag"),
        ] {
            let req = recipe_request(id);
            assert_eq!(req.path, path);
            assert!(table.is_public(&req.normalized_path()));
        }
    }
}
