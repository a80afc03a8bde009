//! Parsing of console input lines.

/// A line typed at the game prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Refresh,
    Logout,
    ToggleStatus,
    Quit,
    Help,
    /// Anything that is not a slash command is an action draft
    Action(String),
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(name) = trimmed.strip_prefix('/') else {
            return Command::Action(trimmed.to_string());
        };
        match name.to_ascii_lowercase().as_str() {
            "start" => Command::Start,
            "refresh" => Command::Refresh,
            "logout" => Command::Logout,
            "status" => Command::ToggleStatus,
            "quit" | "exit" => Command::Quit,
            "help" | "?" => Command::Help,
            _ => Command::Unknown(trimmed.to_string()),
        }
    }
}

pub const HELP: &str = "\
/start    开始试炼
/refresh  重新开始（今日功德圆满后）
/status   折叠或展开状态栏
/logout   登出
/quit     退出
其他输入将作为行动发送";

/// Asked before `/refresh`, which wipes today's progress on the server.
pub const REFRESH_CONFIRMATION: &str = "确定要重新开始今日试炼吗？这将重置所有进度。(y/n)";

/// Whether an answer to a y/n question is affirmative. Anything else declines.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "是" | "确定"
    )
}

/// Two-step username/password prompt shown on the login view
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum LoginPrompt {
    #[default]
    Username,
    Password { username: String },
}

impl LoginPrompt {
    pub fn label(&self) -> &'static str {
        match self {
            LoginPrompt::Username => "用户名:",
            LoginPrompt::Password { .. } => "密码:",
        }
    }

    /// Feed one line; returns the credentials once both have been entered.
    pub fn feed(&mut self, line: &str) -> Option<(String, String)> {
        match std::mem::take(self) {
            LoginPrompt::Username => {
                *self = LoginPrompt::Password {
                    username: line.trim().to_string(),
                };
                None
            }
            LoginPrompt::Password { username } => Some((username, line.to_string())),
        }
    }
}
