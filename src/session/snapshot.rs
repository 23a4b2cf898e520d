use super::message::Message;
use crate::app::Position;

/// Everything a shell needs to draw the widget at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub is_typing: bool,
    pub is_open: bool,
    pub is_online: bool,
    pub is_maintenance_mode: bool,
    pub maintenance_message: String,
    pub title: String,
    pub position: Position,
    pub brand_color: Option<String>,
    pub avatar_url: Option<String>,
}
