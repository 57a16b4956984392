//! Instructions sent to the generation backend.

/// Instruction for the classification call.
///
/// Codes 4 and 5 are listed so the backend has somewhere to put requests it
/// cannot place; they are rejected when the answer is parsed.
pub const CLASSIFICATION_INSTRUCTION: &str = "\
You classify messages sent to a children's storytelling assistant. \
Answer with a single digit and nothing else:
0 - the message is not a request about a story
1 - the message asks for a story that is unsafe or inappropriate for children
2 - the message asks for a brand-new story
3 - the message asks to continue, extend or change the current story
4 - the message is about a story but fits none of the above
5 - the message cannot be understood";

/// System instruction for writing a new story.
pub fn new_story_instruction(word_budget: u32) -> String {
    format!(
        "You are a storytelling AI that writes children's stories from a given prompt. \
         Keep the story under {word_budget} words. \
         Answer in exactly this format:\n\
         TITLE: <title>\n\n\
         STORY: <story>"
    )
}

/// System instruction for rewriting an existing story.
pub fn extend_story_instruction(word_budget: u32) -> String {
    format!(
        "You are a storytelling AI that continues children's stories. \
         You receive an existing story and a new request. \
         Rewrite the whole story so that it includes the request and stays consistent \
         with what already happened. Keep the original title. \
         Keep the story under {word_budget} words. \
         Answer in exactly this format:\n\
         TITLE: <title>\n\n\
         STORY: <story>"
    )
}

/// User message for an extend call.
pub fn extend_story_input(title: &str, body: &str, request: &str) -> String {
    format!("Existing story:\nTITLE: {title}\n\nSTORY: {body}\n\nNew request: {request}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_mention_budget_and_format() {
        for instruction in [new_story_instruction(120), extend_story_instruction(120)] {
            assert!(instruction.contains("120 words"));
            assert!(instruction.contains("TITLE: <title>"));
            assert!(instruction.contains("STORY: <story>"));
        }
    }

    #[test]
    fn extend_input_carries_story_and_request() {
        let input = extend_story_input("Fox", "The fox ran.", "add a bear");
        assert!(input.contains("TITLE: Fox"));
        assert!(input.contains("STORY: The fox ran."));
        assert!(input.ends_with("New request: add a bear"));
    }
}
