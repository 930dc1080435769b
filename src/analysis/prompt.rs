//! Instruction template for the IPA / thought-group analysis request.
//!
//! [`PromptBuilder`] produces a single user message asking the model for a
//! JSON object with exactly two fields, `ipa` and `thought_groups`.  The
//! learners are Vietnamese speakers, so Vietnamese (`"vi"`) is the default
//! instruction language; English (`"en"`) is also available.  Any other
//! language code falls back to English.

// ---------------------------------------------------------------------------
// Instructions
// ---------------------------------------------------------------------------

const INSTRUCTION_VI: &str = "\
Bạn là chuyên gia dạy phát âm tiếng Anh cho người Việt.
Chỉ trả về một đối tượng JSON duy nhất theo mẫu:
{
  \"ipa\": \"<phiên âm IPA của cả câu, theo giọng Anh-Anh hoặc Anh-Mỹ phù hợp với nội dung>\",
  \"thought_groups\": [\"...\", \"...\"]
}
Yêu cầu:
- Không viết lời giải thích hay bất kỳ chữ nào ngoài JSON.
- \"thought_groups\": chia câu thành các cụm ý tự nhiên; không cụm nào được kết thúc bằng một từ chức năng đứng lẻ (a, an, the, in, on, at, to, of, is, are, and, but, or).";

const INSTRUCTION_EN: &str = "\
You are an English pronunciation coach.
Return a single JSON object and nothing else, following this template:
{
  \"ipa\": \"<IPA transcription of the whole text, British or American as the content suggests>\",
  \"thought_groups\": [\"...\", \"...\"]
}
Rules:
- No explanation and no text outside the JSON.
- \"thought_groups\": split the text into natural thought groups; no group may end with a lone function word (a, an, the, in, on, at, to, of, is, are, and, but, or).";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds the analysis instruction for a piece of input text.
///
/// # Example
/// ```rust
/// use clear_speech::analysis::PromptBuilder;
///
/// let prompt = PromptBuilder::new("en").build("I go to the market");
/// assert!(prompt.contains("<<<I go to the market>>>"));
/// ```
pub struct PromptBuilder {
    language: String,
}

impl PromptBuilder {
    /// Create a builder for the given ISO-639-1 language code.
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
        }
    }

    /// Instruction followed by the input text between `<<<` and `>>>`.
    pub fn build(&self, text: &str) -> String {
        let instruction = self.instruction();
        let mut prompt = String::with_capacity(instruction.len() + text.len() + 32);
        prompt.push_str(instruction);
        prompt.push('\n');
        prompt.push_str(self.text_label());
        prompt.push_str(": <<<");
        prompt.push_str(text);
        prompt.push_str(">>>");
        prompt
    }

    fn instruction(&self) -> &'static str {
        match self.language.as_str() {
            "vi" => INSTRUCTION_VI,
            _ => INSTRUCTION_EN,
        }
    }

    fn text_label(&self) -> &'static str {
        match self.language.as_str() {
            "vi" => "Văn bản",
            _ => "Text",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
