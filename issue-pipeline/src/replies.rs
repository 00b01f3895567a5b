// --- User-facing progress messages posted and edited by the pipeline ---

pub const MSG_NO_ISSUE_KEY: &str = "🔍 Please provide a valid issue key like `PROJ-123`.";
pub const MSG_DESCRIPTION_RETRIEVED: &str = "📄 Description retrieved. Analyzing with AI...";
pub const MSG_ANALYZING: &str = "🧠 Analyzing with AI...";
pub const MSG_NO_TOOLS: &str = "🧠 No tools required. No action needed.";
pub const MSG_COMPLETED: &str = "🎉 Issue processing completed!";

pub fn fetching(key: &str) -> String {
    format!("✅ Issue key '{}' detected. Fetching issue details...", key)
}

pub fn fetch_failed(reason: &str) -> String {
    format!("❌ Failed to fetch issue: {}", reason)
}

pub fn tools_detected(tools: &[String]) -> String {
    format!("🛠️ Detected tools: {}. Executing...", tools.join(", "))
}

pub fn tool_running(tool: &str) -> String {
    format!("⚙️ Running {}...", tool)
}

pub fn tool_succeeded(tool: &str) -> String {
    format!("✅ {} completed.", tool)
}

pub fn tool_failed(tool: &str, reason: &str) -> String {
    format!("❌ {} failed: {}", tool, reason)
}

pub fn system_error(error: &str) -> String {
    format!("⚠️ System error: {}", error)
}
