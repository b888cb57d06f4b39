//! System prompt for the weather assistant.

use crate::tools::ToolRegistry;

/// Build the system prompt with tool definitions.
pub fn build_system_prompt(tools: &ToolRegistry) -> String {
    let tool_descriptions = tools
        .list_tools()
        .iter()
        .map(|t| format!("- **{}**: {}", t.name, t.description))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a friendly weather assistant. You help people find out what the weather is like right now anywhere in the world.

## Your Tools

{tool_descriptions}

## Guidelines

1. **Use the tool for facts** - Whenever the user asks about current conditions somewhere, call the weather tool. Never guess temperatures or conditions.

2. **One call per place** - If the user asks about several places, look each of them up.

3. **Units** - Report temperature in degrees Celsius and wind speed in km/h.

4. **Failures** - If the tool says it could not get weather data, tell the user plainly and suggest checking the spelling of the location.

5. **Stay on topic** - Keep answers short and conversational. Use earlier messages in the conversation to resolve follow-up questions like "is it windy there?" or "what about Rome?"."#,
        tool_descriptions = tool_descriptions
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn prompt_lists_registered_tools() {
        let config = Config::new("sk".to_string(), "wx".to_string());
        let prompt = build_system_prompt(&ToolRegistry::with_defaults(&config));
        assert!(prompt.contains("- **get_current_weather**:"));
        assert!(prompt.contains("Celsius"));
    }
}
