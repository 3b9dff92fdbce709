//! Text chunking and graph-fact enrichment.
//!
//! Documents are split into overlapping character windows, preferring to
//! break on paragraph, then sentence, then word boundaries. Each chunk is
//! then enriched with the extracted facts whose subject or object literally
//! occurs in it, producing the "super-chunks" that get embedded.

use tracing::debug;

use super::fact::{relation_title_case, sanitize_relation, Fact};

/// Text window produced by [`chunk_document`]. Chunks are emitted in
/// original-text order and `index` is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub index: usize,
    pub source: String,
}

impl Chunk {
    /// Unique identifier, `"{source}_{index}"`.
    pub fn id(&self) -> String {
        format!("{}_{}", self.source, self.index)
    }
}

/// Split `text` into overlapping windows of at most `size` characters with
/// `overlap` characters carried into the next window. Deterministic for
/// identical input.
pub fn split_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.iter().all(|c| c.is_whitespace()) {
        return Vec::new();
    }

    let size = size.max(1);
    let overlap = overlap.min(size.saturating_sub(1));

    let mut chunks = Vec::new();
    let mut start = 0usize;

    loop {
        let window_end = (start + size).min(chars.len());
        let cut = if window_end == chars.len() {
            window_end
        } else {
            find_cut(&chars, start, window_end)
        };

        let piece: String = chars[start..cut].iter().collect();
        let piece = piece.trim();
        if !piece.is_empty() {
            chunks.push(piece.to_string());
        }

        if cut >= chars.len() {
            break;
        }
        // Step back by the overlap, but always make forward progress.
        start = cut.saturating_sub(overlap).max(start + 1);
    }

    chunks
}

/// Pick a cut point inside `[start, end)`, preferring a paragraph break,
/// then a sentence break, then a word break in the second half of the
/// window, falling back to a hard character cut.
fn find_cut(chars: &[char], start: usize, end: usize) -> usize {
    let floor = start + (end - start) / 2;

    if let Some(cut) = rfind_pair(chars, floor, end, '\n', '\n') {
        return cut;
    }
    if let Some(cut) = rfind_pair(chars, floor, end, '.', ' ') {
        return cut;
    }
    if let Some(cut) = rfind_char(chars, floor, end, '\n') {
        return cut;
    }
    if let Some(cut) = rfind_char(chars, floor, end, ' ') {
        return cut;
    }
    end
}

fn rfind_pair(chars: &[char], lo: usize, hi: usize, a: char, b: char) -> Option<usize> {
    (lo..hi.saturating_sub(1))
        .rev()
        .find(|&i| chars[i] == a && chars[i + 1] == b)
        .map(|i| i + 2)
}

fn rfind_char(chars: &[char], lo: usize, hi: usize, c: char) -> Option<usize> {
    (lo..hi).rev().find(|&i| chars[i] == c).map(|i| i + 1)
}

/// Split a document into indexed chunks tagged with their source filename.
pub fn chunk_document(text: &str, source: &str, size: usize, overlap: usize) -> Vec<Chunk> {
    let chunks: Vec<Chunk> = split_text(text, size, overlap)
        .into_iter()
        .enumerate()
        .map(|(index, text)| Chunk {
            text,
            index,
            source: source.to_string(),
        })
        .collect();

    debug!("Split '{}' into {} chunks", source, chunks.len());
    chunks
}

/// Append matching facts to each chunk. A fact matches when its literal
/// subject or object occurs as a case-sensitive substring of the chunk text.
/// Enrichment is additive: a chunk with no matching facts is returned
/// byte-identical to its input. A fact whose relation normalizes to nothing
/// is invalid and never rendered; only a blank relation gets the
/// `Related To` default, mirroring the graph writer.
pub fn enrich_chunks(chunks: Vec<Chunk>, facts: &[Fact], header: &str) -> Vec<Chunk> {
    if facts.is_empty() {
        return chunks;
    }

    chunks
        .into_iter()
        .map(|mut chunk| {
            let lines: Vec<String> = facts
                .iter()
                .filter(|fact| fact_matches(fact, &chunk.text))
                .filter_map(fact_line)
                .collect();

            if !lines.is_empty() {
                chunk.text = format!("{}\n\n{}\n{}", chunk.text, header, lines.join("\n"));
            }
            chunk
        })
        .collect()
}

fn fact_matches(fact: &Fact, text: &str) -> bool {
    (!fact.subject.is_empty() && text.contains(&fact.subject))
        || (!fact.object.is_empty() && text.contains(&fact.object))
}

fn fact_line(fact: &Fact) -> Option<String> {
    let relation = if fact.relation.trim().is_empty() {
        "Related To".to_string()
    } else {
        relation_title_case(&sanitize_relation(&fact.relation)?)
    };

    Some(format!("- {} -> {} -> {}", fact.subject, relation, fact.object))
}
