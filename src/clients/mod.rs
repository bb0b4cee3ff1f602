//! 外部服务客户端

pub mod canvas_client;

pub use canvas_client::{CanvasClient, QuizGroups};
