use chrono::Local;
use colored::Colorize;

use crate::session::{Message, Sender, SessionSnapshot};

/// Parse a `#rgb`, `#rrggbb` or `rgb(r, g, b)` brand color
///
/// Other CSS forms (hsl, named colors) are not mapped and yield `None`.
fn parse_brand_color(color: &str) -> Option<(u8, u8, u8)> {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
        return match hex.len() {
            3 => {
                let mut rgb = hex.chars().map(|c| channel(&c.to_string()).map(|v| v * 17));
                Some((rgb.next()??, rgb.next()??, rgb.next()??))
            }
            6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            _ => None,
        };
    }

    let inner = color.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(|part| part.trim().parse::<u8>().ok());
    let rgb = (parts.next()??, parts.next()??, parts.next()??);
    parts.next().is_none().then_some(rgb)
}

fn branded(text: &str, brand_color: Option<&str>) -> String {
    match brand_color.and_then(parse_brand_color) {
        Some((r, g, b)) => text.bold().truecolor(r, g, b).to_string(),
        None => text.bold().to_string(),
    }
}

/// Title line with the online indicator and bot avatar
pub fn render_header(snapshot: &SessionSnapshot) -> String {
    let status = if snapshot.is_online {
        format!("{} Online", "●".green())
    } else {
        format!("{} Offline", "●".dimmed())
    };
    let mut header = format!(
        "{}  {}",
        branded(&snapshot.title, snapshot.brand_color.as_deref()),
        status
    );
    if let Some(avatar) = &snapshot.avatar_url {
        header.push_str(&format!("  {}", format!("avatar: {}", avatar).dimmed()));
    }
    header
}

pub fn render_maintenance_banner(snapshot: &SessionSnapshot) -> Option<String> {
    snapshot
        .is_maintenance_mode
        .then(|| format!("⚠ {}", snapshot.maintenance_message).yellow().to_string())
}

pub fn render_message(message: &Message) -> String {
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");
    match message.sender {
        Sender::User => format!("[{}] {} {}", time, "You:".cyan().bold(), message.content),
        Sender::Bot => format!("[{}] {} {}", time, "Bot:".magenta().bold(), message.content),
    }
}

pub fn render_typing() -> String {
    "Bot is typing…".dimmed().italic().to_string()
}

/// The whole widget as it should appear when open
pub fn render_transcript(snapshot: &SessionSnapshot) -> String {
    let mut lines = vec![render_header(snapshot)];
    if let Some(banner) = render_maintenance_banner(snapshot) {
        lines.push(banner);
    }
    lines.extend(snapshot.messages.iter().map(render_message));
    if snapshot.is_typing {
        lines.push(render_typing());
    }
    lines.join("\n")
}

/// What a closed widget shows: just the launcher, tagged with its corner
pub fn render_launcher(snapshot: &SessionSnapshot) -> String {
    format!(
        "{} {} [{}] (type /open to expand)",
        "💬".bold(),
        branded(&snapshot.title, snapshot.brand_color.as_deref()),
        snapshot.position
    )
}

pub fn render_help() -> String {
    [
        "/open              show the conversation",
        "/close             hide the conversation",
        "/toggle            flip visibility",
        "/greeting <text>   change the greeting",
        "/history           print the full conversation",
        "/help              show this help",
        "/quit              leave",
        "anything else is sent as a message",
    ]
    .join("\n")
}
