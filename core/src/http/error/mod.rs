pub use auth_error::{AuthError, UnauthorizedBody};

mod auth_error;
