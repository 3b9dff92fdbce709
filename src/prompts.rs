//! Fixed prompt templates for extraction, rephrasing, Cypher generation and
//! final-answer synthesis.
//!
//! Templates are plain string constants with `{placeholder}` markers; the
//! substitution functions below are the only way the rest of the crate
//! builds prompts, so the wording lives in exactly one place.

/// Instructs the model to emit a JSON list of 5-element fact arrays using the
/// closed entity label set.
pub const GRAPH_EXTRACTION_PROMPT: &str = r#"You are an expert in Information Extraction. From the text below, extract every important entity and the relationships between them.
Your task is to identify the Subject, Subject Label, Relation, Object, and Object Label.
Valid labels are: 'PERSON', 'ORGANIZATION', 'ROLE', 'PROJECT', 'LOCATION', 'DATE', 'DOCUMENT'.

Your output MUST be a valid JSON string containing a list of lists.
Each inner list must have exactly 5 elements: [subject, subject_label, relation, object, object_label].

Example:
Text: "In the Face Recognition Attendance project, Kimi Dandy Yudanarko is a Participant. This certificate was signed by Ely Mulyadi, Manager of TEFA JTI Innovation, in Jember on 29 June 2025."
JSON Output:
[
    ["Kimi Dandy Yudanarko", "PERSON", "IS_A", "Participant", "ROLE"],
    ["Ely Mulyadi", "PERSON", "HOLDS_POSITION", "Manager of TEFA JTI Innovation", "ROLE"],
    ["Certificate", "DOCUMENT", "SIGNED_BY", "Ely Mulyadi", "PERSON"],
    ["Certificate", "DOCUMENT", "ISSUED_IN", "Jember", "LOCATION"],
    ["Certificate", "DOCUMENT", "ISSUED_ON", "29 June 2025", "DATE"]
]

IMPORTANT: Extract full names and titles as completely as possible. Only use the labels listed above.

Text to analyze:
---
{text}
---

JSON Output:
"#;

/// Rewrites a follow-up question into a standalone one.
pub const REPHRASE_QUESTION_PROMPT: &str = r#"Based on the following conversation history, rephrase the "Follow Up Input" to be a standalone question that contains all the necessary context from the chat history.

Chat History:
{chat_history}

Follow Up Input: {query}

Standalone question:"#;

/// Turns a natural-language question into a Cypher query over the fact graph.
pub const CYPHER_GENERATION_PROMPT: &str = r#"You are a Cypher expert. Convert the following question into a Cypher query for Neo4j.
Graph schema: nodes carry specific labels such as :PERSON, :ROLE, :ORGANIZATION, etc. and a 'name' property.
Return only the query, without explanation or markdown.

IMPORTANT: Keep every entity name and term (such as role titles or location names) in the Cypher query EXACTLY as they appear in the user's question. Do NOT translate them.

Example:
Question: who is the TEFA manager?
Query: MATCH (p:PERSON)-[]->(r:ROLE) WHERE r.name CONTAINS 'TEFA Manager' RETURN p.name

Question: where was the certificate issued?
Query: MATCH (d:DOCUMENT)-[:ISSUED_IN]->(l:LOCATION) RETURN l.name

Question: {query}
Query:
"#;

/// Answers the user strictly from the retrieved context.
pub const FINAL_ANSWER_PROMPT: &str = r#"You are a smart, expert AI assistant. Based on the highly relevant information below — which includes the original text and the key facts extracted from it — answer the user's question accurately and directly, in {language}.
If the answer is not present in the context, say that you could not find the information in the documents.

RETRIEVED INFORMATION (COMBINED CONTEXT):
---
{context}
---

USER QUESTION:
{rephrased_query}

YOUR ANSWER:
"#;

/// Build the knowledge graph extraction prompt for a document.
pub fn extraction_prompt(text: &str) -> String {
    GRAPH_EXTRACTION_PROMPT.replace("{text}", text)
}

/// Build the rephrase prompt from a formatted history and a follow-up query.
pub fn rephrase_prompt(chat_history: &str, query: &str) -> String {
    REPHRASE_QUESTION_PROMPT
        .replace("{chat_history}", chat_history)
        .replace("{query}", query)
}

/// Build the Cypher generation prompt for a question.
pub fn cypher_prompt(query: &str) -> String {
    CYPHER_GENERATION_PROMPT.replace("{query}", query)
}

/// Build the final answer prompt from context and the standalone question.
pub fn final_answer_prompt(context: &str, rephrased_query: &str, language: &str) -> String {
    FINAL_ANSWER_PROMPT
        .replace("{context}", context)
        .replace("{rephrased_query}", rephrased_query)
        .replace("{language}", language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_prompt_embeds_text() {
        let prompt = extraction_prompt("Alice works at Acme.");
        assert!(prompt.contains("Alice works at Acme."));
        assert!(!prompt.contains("{text}"));
        assert!(prompt.contains("'PERSON'"));
        assert!(prompt.contains("5 elements"));
    }

    #[test]
    fn test_rephrase_prompt_embeds_both_fields() {
        let prompt = rephrase_prompt("Human: hi\nAI: hello", "where does he work?");
        assert!(prompt.contains("Human: hi"));
        assert!(prompt.contains("where does he work?"));
        assert!(!prompt.contains("{chat_history}"));
        assert!(!prompt.contains("{query}"));
    }

    #[test]
    fn test_final_answer_prompt_substitution() {
        let prompt = final_answer_prompt("some context", "who signed it?", "English");
        assert!(prompt.contains("some context"));
        assert!(prompt.contains("who signed it?"));
        assert!(prompt.contains("in English"));
        assert!(!prompt.contains("{context}"));
        assert!(!prompt.contains("{language}"));
    }

    #[test]
    fn test_cypher_prompt_keeps_schema_hint() {
        let prompt = cypher_prompt("who is the manager?");
        assert!(prompt.contains("who is the manager?"));
        assert!(prompt.contains(":PERSON"));
    }
}
