use simsearch::{
    document::Document, loader::SourceKind, session::SourceLoad, vector_index::SearchResult,
};

const PREVIEW_CHARS: usize = 80;

pub fn format_results(results: &[SearchResult]) -> String {
    let mut out = format!("Top {} results\n", results.len());
    for result in results {
        out.push_str(&format!(
            "{:>2}. {}\n    source: {}  similarity: {:.3}\n",
            result.rank,
            result.document.content(),
            result.document.source().unwrap_or("unknown"),
            result.similarity(),
        ));
    }
    out
}

pub fn format_documents(documents: &[Document]) -> String {
    if documents.is_empty() {
        return "No documents loaded yet\n".to_string();
    }
    documents
        .iter()
        .enumerate()
        .map(|(i, doc)| format!("{}. {}\n", i + 1, preview(doc.content())))
        .collect()
}

/// Report of a source load: warning, fallback and document count.
pub fn format_load(load: &SourceLoad, requested: SourceKind) -> String {
    let mut out = String::new();
    if let Some(warning) = &load.warning {
        out.push_str(&format!("Warning: {warning}\n"));
    }
    let loaded_from = if load.sample_fallback {
        out.push_str("Using sample data instead\n");
        SourceKind::Sample
    } else {
        requested
    };
    if load.is_empty() {
        out.push_str("No documents loaded\n");
    } else {
        out.push_str(&format!(
            "Loaded {} documents from {loaded_from}\n",
            load.documents.len()
        ));
    }
    out
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    }
}
