pub const ENTITY_SYSTEM: &str = "You are a named-entity recognizer. \
    You find the names of people in the input text. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// `{text}` is replaced with the document text.
pub const ENTITY_PROMPT_TEMPLATE: &str = r#"Find every person's name in the text below.

Return JSON of the form:
{"entities": [{"text": "<exact span copied from the input>", "label": "PERSON"}]}

Rules:
- Report PERSON spans only. Skip organizations, places, dates and everything else.
- List names in the order they first appear in the text.
- Copy each span exactly as written; do not normalize casing or spacing.
- Do not invent names that are not in the text.

Text:
"""
{text}
""""#;

/// Fixed input used to verify the recognizer at startup.
pub const STARTUP_CHECK_TEXT: &str = "Ada Lovelace worked with Charles Babbage in London.";
