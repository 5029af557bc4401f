//! Prompt templates for the classifier and summarizer models.
//!
//! Pure string templating. The summary length cap is an instruction to the
//! model and is not enforced on its output.

/// Word cap requested from the summarizer model.
pub const SUMMARY_MAX_WORDS: usize = 50;

/// Ask the model to answer with exactly one of `labels`.
pub fn build_classification_prompt(text: &str, labels: &[&str]) -> String {
    format!(
        "Classifique o texto abaixo em uma das categorias, escreva a classificação \
         exatamente com uma das palavras a seguir: {}.\nTexto: {text}\nCategoria:",
        labels.join(", ")
    )
}

/// Ask the model for a short summary, passing the verdict so it can tailor
/// the tone.
pub fn build_summary_prompt(text: &str, is_fake_news: bool) -> String {
    format!(
        "Apenas resuma o texto abaixo em no máximo {SUMMARY_MAX_WORDS} palavras de forma que \
         eu consiga entender do que se trata a notícia, sem comentários adicionais sobre. \
         Considere que o texto possui um classificador isFakeNews:{is_fake_news} para te \
         ajudar a formar o resumo:\nTexto: {text}\n:"
    )
}
