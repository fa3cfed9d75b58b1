//! Edge server: the navigation-time route guard, the `account_type` cookie
//! server action, and the HTML shell for the app's pages.

pub mod app;
pub mod config;
pub mod middleware;
