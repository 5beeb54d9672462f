pub const CMD_FILE: &str = "/file";
pub const CMD_UPLOAD: &str = "/upload";
pub const CMD_SEND: &str = "/send";
pub const CMD_HELP: &str = "/help";
pub const CMD_QUIT: &str = "/quit";

pub const PROMPT: &str = "> ";
pub const TITLE: &str = "docqa: ask questions about your documents";

pub const HELP_LINES: [&str; 5] = [
    "  /file <path>   choose a document",
    "  /upload        upload the chosen document",
    "  /send <text>   send <text> as a question",
    "  /help          show this help",
    "  /quit          exit",
];

pub const NOTICE_CHAT_DISABLED: &str = "Upload a document before asking questions.";
pub const NOTICE_BUSY: &str = "Still waiting for the previous answer.";
