/// Constants module to avoid magic numbers in the codebase

// Session defaults
pub const DEFAULT_GREETING: &str = "Hi! How can I help you today?";
pub const DEFAULT_TITLE: &str = "Chat Support";
pub const DEFAULT_MAINTENANCE_MESSAGE: &str =
    "We're currently performing maintenance. Please try again later.";
pub const DEFAULT_MAX_MESSAGES: usize = 100;
pub const GREETING_MESSAGE_ID: &str = "greeting";

// Storage
pub const DEFAULT_STORAGE_KEY: &str = "eloquent-chat-messages";

// Reply texts
pub const APOLOGY_MESSAGE: &str =
    "Sorry, I'm having trouble responding right now. Please try again.";
pub const UNPROCESSABLE_MESSAGE: &str = "Sorry, I couldn't process that.";

// Timeouts
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Simulated responder
pub const SIMULATED_DELAY_MIN_MS: u64 = 1000;
pub const SIMULATED_DELAY_MAX_MS: u64 = 2000;
pub const CANNED_RESPONSES: &[&str] = &[
    "Thanks for your message! I'm here to help you with any questions.",
    "I understand you're asking about that. Let me provide you with some information.",
    "That's a great question! Here's what I can tell you about that.",
    "I appreciate you reaching out. Let me assist you with that.",
    "Thanks for contacting us! I'll be happy to help you with your inquiry.",
];

// Configuration
pub const CONFIG_ENV_PREFIX: &str = "ELOQUENT_CHAT_";
pub const APP_NAME: &str = "eloquent-chat";
