use crate::domain::model::{CommandReport, WorkflowCommand};
use serde::{Deserialize, Serialize};

pub const PREFIX_COMMANDS: &[&str] = &[
    "FOLDER",
    "DOCUMENT",
    "DOC",
    "DONOR",
    "YEAR",
    "DATE",
    "COLLECTION",
    "BOX",
];

pub const KEYWORD_COMMANDS: &[&str] = &["SKIP", "END", "END_DOCUMENT", "NEW_FOLDER", "NEW_DOCUMENT"];

/// 解析 QR 文字時採用的指令規則
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandPolicy {
    /// 任何 `PREFIX:value` 或單字都視為指令
    #[default]
    Open,
    /// 只接受固定的前綴與關鍵字，其餘只保留 raw
    Vocabulary,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandParser {
    policy: CommandPolicy,
}

impl CommandParser {
    pub fn new(policy: CommandPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> CommandPolicy {
        self.policy
    }

    /// 空白字串回傳 `None`
    pub fn parse(&self, text: &str) -> Option<WorkflowCommand> {
        if text.trim().is_empty() {
            return None;
        }

        let mut command = WorkflowCommand {
            raw: text.to_string(),
            command: None,
            value: None,
        };

        match text.split_once(':') {
            Some((prefix, value)) => {
                let prefix = prefix.to_uppercase();
                if self.accepts_prefix(&prefix) {
                    command.command = Some(prefix);
                    command.value = Some(value.to_string());
                }
            }
            None => {
                let keyword = text.to_uppercase();
                if self.accepts_keyword(&keyword) {
                    command.command = Some(keyword);
                }
            }
        }

        Some(command)
    }

    pub fn parse_all<I, S>(&self, texts: I) -> CommandReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let commands: Vec<WorkflowCommand> = texts
            .into_iter()
            .filter_map(|text| self.parse(text.as_ref()))
            .collect();

        tracing::debug!(
            "Parsed {} commands under {:?} policy",
            commands.len(),
            self.policy
        );

        CommandReport::from(commands)
    }

    fn accepts_prefix(&self, prefix: &str) -> bool {
        match self.policy {
            CommandPolicy::Open => true,
            CommandPolicy::Vocabulary => PREFIX_COMMANDS.contains(&prefix),
        }
    }

    fn accepts_keyword(&self, keyword: &str) -> bool {
        match self.policy {
            CommandPolicy::Open => true,
            CommandPolicy::Vocabulary => KEYWORD_COMMANDS.contains(&keyword),
        }
    }
}
