// handlers/public/auth/mod.rs - Account creation and token acquisition
//
// POST /users          register a new account
// POST /users/signin   exchange credentials for access, refresh and CSRF tokens
// POST /users/token    exchange a stored refresh token for a new access token
pub mod login;
pub mod refresh;
pub mod register;

pub use login::signin;
pub use refresh::refresh_token;
pub use register::signup;
