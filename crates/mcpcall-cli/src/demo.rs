//! The example driver: two sequential tool calls, each result printed in turn.

use std::io::Write;

use anyhow::Result;
use mcpcall_mcp::McpClient;
use mcpcall_types::ToolArguments;

/// Call `get_resume_info`, then `get_skills` with `min_weight = 8`.
///
/// The second call starts only after the first result has been written.
pub async fn run_demo<W: Write>(client: &McpClient, out: &mut W) -> Result<()> {
    writeln!(out, "Calling get_resume_info...")?;
    let result = client.call_tool("get_resume_info", None).await?;
    write_json(out, &result)?;

    writeln!(out, "\nCalling get_skills...")?;
    let mut arguments = ToolArguments::new();
    arguments.insert("min_weight".into(), serde_json::json!(8));
    let skills = client.call_tool("get_skills", Some(arguments)).await?;
    write_json(out, &skills)
}

/// Write a JSON value with two-space indentation.
pub fn write_json<W: Write>(out: &mut W, value: &serde_json::Value) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}
