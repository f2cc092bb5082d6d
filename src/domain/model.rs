use serde::{Deserialize, Serialize, Serializer};

/// 偵測器回報的角點座標，序列化為 `[x, y]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point(pub f32, pub f32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Qr,
    /// 條碼，附帶偵測器回報的碼制名稱（可能為空）
    Barcode(String),
}

impl SymbolKind {
    pub fn as_str(&self) -> &str {
        match self {
            SymbolKind::Qr => "qr",
            SymbolKind::Barcode(subtype) if subtype.is_empty() => "barcode",
            SymbolKind::Barcode(subtype) => subtype,
        }
    }
}

impl Serialize for SymbolKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectedSymbol {
    #[serde(rename = "type")]
    pub kind: SymbolKind,
    #[serde(rename = "data")]
    pub text: String,
    #[serde(rename = "points")]
    pub corners: Option<Vec<Point>>,
}

impl DetectedSymbol {
    pub fn qr(text: impl Into<String>, corners: Option<Vec<Point>>) -> Self {
        Self {
            kind: SymbolKind::Qr,
            text: text.into(),
            corners,
        }
    }

    pub fn barcode(
        subtype: impl Into<String>,
        text: impl Into<String>,
        corners: Option<Vec<Point>>,
    ) -> Self {
        Self {
            kind: SymbolKind::Barcode(subtype.into()),
            text: text.into(),
            corners,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowCommand {
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub count: usize,
    pub codes: Vec<DetectedSymbol>,
}

impl From<Vec<DetectedSymbol>> for DetectionReport {
    fn from(codes: Vec<DetectedSymbol>) -> Self {
        Self {
            count: codes.len(),
            codes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandReport {
    pub count: usize,
    pub commands: Vec<WorkflowCommand>,
    pub has_workflow_commands: bool,
}

impl From<Vec<WorkflowCommand>> for CommandReport {
    fn from(commands: Vec<WorkflowCommand>) -> Self {
        let has_workflow_commands = commands.iter().any(|c| c.command.is_some());
        Self {
            count: commands.len(),
            commands,
            has_workflow_commands,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}
