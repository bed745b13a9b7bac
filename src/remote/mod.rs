pub mod api;
pub mod sync;

pub use api::{HttpTodoApi, TodoApi};
pub use sync::RemoteSync;
