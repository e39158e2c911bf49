//! Persona instructions and synthetic turns for each stage
//!
//! The instruction texts are configuration: nothing in the state machine
//! depends on their wording.

use crate::catalog::ElectronicComponent;
use crate::llm::Message;

/// Shown in place of a model turn when the gateway call fails
pub const MENTOR_UNAVAILABLE: &str =
    "Error: Could not get a response from the mentor. Please try again.";

/// Ignite persona: proposes one project idea for the drawn components
const IGNITE_INSTRUCTION: &str = r"You are an electronics project mentor helping secondary and university students. They have a heartbeat detection circuit and a set of three components.

Your task is to suggest ONE creative, practical project idea that:
1. Uses their heartbeat detection circuit as the main sensor.
2. Incorporates all three provided components meaningfully.
3. Solves a real problem for students. The themes can be diverse: focus and productivity, physical activity and health, art and music, social connection, or gaming and entertainment.
4. Is achievable with basic electronics knowledge.
5. Has clear educational value.

Format your response as a brief, enthusiastic project description (2-3 sentences max) that starts with a clear and descriptive project name in quotes. Make it inspiring and practical. Vary the project themes.";

/// Huddle persona; `{project_idea}` is substituted on use
const HUDDLE_INSTRUCTION: &str = r#"You are a design thinking coach. A student has a project idea: "{project_idea}". Your goal is to guide them to think deeply about their user by asking ONE insightful question at a time. Help them define who the user is, what their needs are, and in what context they would use this device. Keep your responses concise (2-3 sentences). Ask open-ended questions and wait for the student to respond. Never suggest moving to the next stage yourself."#;

/// Build persona: turns the idea and Huddle log into a first-steps brief
const BUILD_INSTRUCTION: &str = r####"You are a technical mentor. A student has defined their project idea and refined it through a conversation. Your task is to generate a clear, actionable 'First Steps' project brief based on the provided project idea and the conversation log.

The brief should include:
1. **Project Title:** The original project idea name.
2. **User Profile:** A brief, 1-2 sentence summary of the target user, based on the conversation.
3. **Problem Solved:** A brief, 1-2 sentence summary of the problem this project solves for the user.
4. **Bill of Materials:** A list of the required electronic components.
5. **Circuit Logic:** A high-level, step-by-step overview of how the circuit should be connected.
6. **Code Plan (Pseudo-code):** A simple pseudo-code outline for the main software logic (e.g., inside a loop function).
7. **Next Step:** The single most important first action the student should take to start building and testing.

Format the output clearly with markdown-style headings (e.g., "### Bill of Materials")."####;

pub fn ignite_instruction() -> &'static str {
    IGNITE_INSTRUCTION
}

pub fn huddle_instruction(project_idea: &str) -> String {
    HUDDLE_INSTRUCTION.replace("{project_idea}", project_idea)
}

pub fn build_instruction() -> &'static str {
    BUILD_INSTRUCTION
}

/// The single user turn sent when asking for an idea
pub fn ignite_prompt(components: &[ElectronicComponent]) -> Message {
    let names = components
        .iter()
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join(", ");
    Message::user(format!("The components are: {names}."))
}

/// Synthetic opener for the Huddle; never stored in the transcript
pub fn huddle_opening(project_idea: &str) -> Message {
    Message::user(format!(
        "Let's start the huddle for my project idea: \"{project_idea}\""
    ))
}

/// Closing turn appended to the frozen transcript for the Build request
pub fn build_closing(project_idea: &str) -> Message {
    Message::user(format!(
        "Based on our conversation, please generate the final project brief for \"{project_idea}\"."
    ))
}
