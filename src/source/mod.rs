pub mod emoji;
pub mod fetch;
pub mod guard;
pub mod message;
pub mod resolver;
