// Gateway module for the terminal shell - follows the Train Station Pattern
// All external access must go through this gateway

mod input;
mod render;

pub use input::{parse_input, ShellInput};
pub use render::{
    render_header, render_help, render_launcher, render_maintenance_banner, render_message,
    render_transcript, render_typing,
};
