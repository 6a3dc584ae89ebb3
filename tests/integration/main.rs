//! HTTP integration tests. Every test builds its own app over the
//! in-memory store and the manual expiry scheduler.

mod helpers;

mod collection_test;
mod project_test;
mod resource_test;
mod session_test;
mod template_test;
