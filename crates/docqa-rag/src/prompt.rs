//! Prompt/message builder
//!
//! Produces the ordered message sequence for the language model. The
//! order is fixed: instruction, context, source hint, then the user
//! query verbatim. The context and hint messages are always present,
//! explicitly marked when empty, so the model can distinguish "no
//! documents found" from a missing section.

use docqa_core::ChatMessage;

/// Base instruction: output format and sourcing rules
pub const BASE_INSTRUCTION: &str = "\
Eres un asistente que responde preguntas sobre los documentos internos de la organización.
Responde en español, de forma clara y concisa, usando únicamente la información del contexto proporcionado.
Si el contexto contiene la respuesta, úsala directamente.
Termina siempre con una sección \"Fuentes:\" listando los documentos utilizados.";

/// Stricter instruction for the single quality-gate retry: forbids
/// disclaimers and demands direct use of the context.
pub const STRICT_INSTRUCTION: &str = "\
Responde usando directamente la información del contexto proporcionado.
El contexto ES el contenido de los documentos: no digas que no tienes acceso a ellos.
Prohibido incluir descargos, disculpas o frases de incertidumbre.
Responde de forma directa y termina con una sección \"Fuentes:\".";

const EMPTY_CONTEXT_MARKER: &str = "(vacío)";
const EMPTY_SOURCES_MARKER: &str = "(ninguna)";

/// Build the message sequence for the initial completion call.
pub fn build_messages(query: &str, context: &str, source_hint: &str) -> Vec<ChatMessage> {
    build_with_instruction(BASE_INSTRUCTION, query, context, source_hint)
}

/// Build the message sequence for the quality-gate retry.
pub fn build_retry_messages(query: &str, context: &str, source_hint: &str) -> Vec<ChatMessage> {
    build_with_instruction(STRICT_INSTRUCTION, query, context, source_hint)
}

fn build_with_instruction(
    instruction: &str,
    query: &str,
    context: &str,
    source_hint: &str,
) -> Vec<ChatMessage> {
    let context_body = if context.trim().is_empty() {
        EMPTY_CONTEXT_MARKER
    } else {
        context
    };
    let sources_body = if source_hint.trim().is_empty() {
        EMPTY_SOURCES_MARKER
    } else {
        source_hint
    };

    vec![
        ChatMessage::system(instruction),
        ChatMessage::system(format!("Contexto recuperado:\n{context_body}")),
        ChatMessage::system(format!("Fuentes sugeridas:\n{sources_body}")),
        ChatMessage::user(query),
    ]
}
