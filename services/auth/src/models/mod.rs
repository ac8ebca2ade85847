//! Authentication service models

pub mod user;

pub use user::{
    LoginRequest, LoginResponse, NewAccount, RegisterRequest, RegisteredUser, UserCredentials,
};
