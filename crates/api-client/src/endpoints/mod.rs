//! Endpoint-specific API implementations
//!
//! Each module is a thin, fixed mapping from a named operation to one
//! transport call. Payloads come back exactly as the backend sent them.
//!
//! ## Mapping to the Recipe backend
//!
//! | Module | Operation | Route | Auth |
//! |--------|-----------|-------|------|
//! | `recipes` | `search` | `GET /recipes/search?q=` | public |
//! | `recipes` | `get_by_id` | `GET /recipes/{id}` | public |
//! | `saved` | `list` | `GET /users/me/saved` | protected |
//! | `saved` | `save` | `POST /users/me/saved` | protected |
//! | `saved` | `unsave` | `DELETE /users/me/saved/{id}` | protected |
//! | `auth` | `login` | `POST /auth/login` | no token required |
//! | `auth` | `signup` | `POST /auth/signup` | no token required |
//! | `health` | `check` | `GET /health`, then `GET /` | never sent |

pub mod auth;
pub mod health;
pub mod recipes;
pub mod saved;

pub use auth::AuthApi;
pub use health::{HealthApi, ProbeResult};
pub use recipes::RecipesApi;
pub use saved::SavedApi;
