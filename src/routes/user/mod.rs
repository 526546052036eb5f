mod handler;
mod model;

pub use handler::{create_user, get_user, get_users, search_users, update_user};
pub use model::{PageQuery, SearchQuery, UserInput};
