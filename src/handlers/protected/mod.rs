// handlers/protected/mod.rs - Handlers behind JWT authentication
//
// Every handler receives the caller as an explicit `AuthUser` argument.
// Writes additionally pass the CSRF guard before reaching the handler.
pub mod lists;
pub mod todos;
pub mod users;
