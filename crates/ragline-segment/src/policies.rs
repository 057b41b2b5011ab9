//! Segmentation policies over byte spans of the source text.
//!
//! All policies return ordered `Draft` spans with strictly increasing start
//! offsets. Splitting always happens on char boundaries.

use crate::metadata::heading_like;
use crate::SegmentConfig;

/// A chunk-to-be: a half-open byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draft {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Span {
    pub start: usize,
    pub end: usize,
}

const TRANSITION_WORDS: &[&str] = &[
    "however",
    "furthermore",
    "moreover",
    "therefore",
    "meanwhile",
    "additionally",
    "nevertheless",
    "consequently",
    "finally",
    "overall",
];

const CONNECTIVE_WORDS: &[&str] = &[
    "because",
    "therefore",
    "thus",
    "hence",
    "since",
    "consequently",
    "accordingly",
    "specifically",
];

/// Fixed-size window with sentence-terminator snapping.
///
/// The raw window end is pulled back to the nearest `. ! ? \n` as long as
/// that keeps at least half the window; the next window starts `overlap`
/// bytes before the previous end. Start offsets strictly increase every
/// iteration even on degenerate input.
pub fn fixed_window(text: &str, cfg: &SegmentConfig) -> Vec<Draft> {
    let len = text.len();
    let mut drafts = Vec::new();
    let mut start = 0usize;
    while start < len {
        let mut end = floor_boundary(text, (start + cfg.max_chunk_size).min(len));
        if end < len {
            let half = start + cfg.max_chunk_size / 2;
            if let Some(pos) = text[start..end].rfind(|c: char| matches!(c, '.' | '!' | '?' | '\n'))
            {
                // terminators are all single-byte
                let snapped = start + pos + 1;
                if snapped > half {
                    end = snapped;
                }
            }
        }
        if end <= start {
            end = ceil_boundary(text, start + 1).min(len);
        }
        drafts.push(Draft { start, end });
        if end >= len {
            break;
        }
        let mut next = floor_boundary(text, end.saturating_sub(cfg.overlap));
        if next <= start {
            next = ceil_boundary(text, start + 1);
        }
        start = next;
    }
    drafts
}

/// Accumulate whole sentences until adding the next one would exceed the
/// cap, carrying `overlap_sentences` into the following chunk.
pub fn sentence_accumulate(text: &str, cfg: &SegmentConfig) -> Vec<Draft> {
    let sentences = sentence_spans(text);
    accumulate(&sentences, cfg.max_chunk_size, cfg.overlap_sentences)
}

/// Accumulate paragraphs (blank-line boundaries) the same way; a paragraph
/// that alone exceeds the cap is sentence-segmented and its sub-chunks are
/// spliced in place.
pub fn paragraph_accumulate(text: &str, cfg: &SegmentConfig) -> Vec<Draft> {
    let mut drafts = Vec::new();
    let mut acc: Vec<Span> = Vec::new();
    for p in paragraph_spans(text) {
        if p.end - p.start > cfg.max_chunk_size {
            flush(&mut acc, &mut drafts);
            let sub: Vec<Span> = sentence_spans(&text[p.start..p.end])
                .iter()
                .map(|s| Span { start: s.start + p.start, end: s.end + p.start })
                .collect();
            drafts.extend(accumulate(&sub, cfg.max_chunk_size, cfg.overlap_sentences));
            continue;
        }
        if let Some(first) = acc.first() {
            if p.end - first.start > cfg.max_chunk_size {
                flush(&mut acc, &mut drafts);
            }
        }
        acc.push(p);
    }
    flush(&mut acc, &mut drafts);
    drafts
}

/// Default policy. Prefers paragraph accumulation when the input has
/// paragraph breaks and every resulting chunk lands inside
/// `[min_chunk_size, max_chunk_size]`; otherwise sentence accumulation
/// augmented with break-point heuristics.
pub fn semantic_hybrid(text: &str, cfg: &SegmentConfig) -> Vec<Draft> {
    if text.contains("\n\n") {
        let drafts = paragraph_accumulate(text, cfg);
        let fits = !drafts.is_empty()
            && drafts.iter().all(|d| {
                let n = d.end - d.start;
                n >= cfg.min_chunk_size && n <= cfg.max_chunk_size
            });
        if fits {
            return drafts;
        }
    }
    breakpoint_accumulate(text, cfg)
}

/// Sentence accumulation that only closes a chunk once it passes 80% of the
/// target size and the following sentence begins at a natural break point.
/// The overlap carried forward is 2 sentences when the closing chunk uses
/// causal/technical connectives, else 1.
fn breakpoint_accumulate(text: &str, cfg: &SegmentConfig) -> Vec<Draft> {
    let sentences = sentence_spans(text);
    let target = cfg.max_chunk_size;
    let mut drafts = Vec::new();
    let mut acc: Vec<Span> = Vec::new();
    for (i, &s) in sentences.iter().enumerate() {
        acc.push(s);
        let first = acc[0];
        let extent = s.end - first.start;
        let forced = extent > target;
        let natural = extent * 10 > target * 8
            && sentences
                .get(i + 1)
                .is_some_and(|next| natural_break(text, s.end, *next));
        if forced || natural {
            let last = acc[acc.len() - 1];
            drafts.push(Draft { start: first.start, end: last.end });
            let overlap = if has_connectives(&text[first.start..last.end]) { 2 } else { 1 };
            let carry = overlap.min(acc.len().saturating_sub(1));
            acc = acc.split_off(acc.len() - carry);
        }
    }
    flush(&mut acc, &mut drafts);
    drafts
}

fn accumulate(sentences: &[Span], cap: usize, overlap_sentences: usize) -> Vec<Draft> {
    let mut drafts = Vec::new();
    let mut acc: Vec<Span> = Vec::new();
    for &s in sentences {
        if let Some(first) = acc.first() {
            if s.end - first.start > cap {
                let last = acc[acc.len() - 1];
                drafts.push(Draft { start: first.start, end: last.end });
                let carry = overlap_sentences.min(acc.len().saturating_sub(1));
                acc = acc.split_off(acc.len() - carry);
            }
        }
        acc.push(s);
    }
    flush(&mut acc, &mut drafts);
    drafts
}

fn flush(acc: &mut Vec<Span>, drafts: &mut Vec<Draft>) {
    if let Some(first) = acc.first() {
        let last = acc[acc.len() - 1];
        drafts.push(Draft { start: first.start, end: last.end });
    }
    acc.clear();
}

fn natural_break(text: &str, prev_end: usize, next: Span) -> bool {
    if text[prev_end..next.start].contains("\n\n") {
        return true;
    }
    let sentence = &text[next.start..next.end];
    if let Some(word) = sentence.split_whitespace().next() {
        let word: String = word
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        if TRANSITION_WORDS.contains(&word.as_str()) {
            return true;
        }
    }
    heading_like(sentence)
}

fn has_connectives(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| CONNECTIVE_WORDS.contains(&w))
}

/// Sentence spans, terminator-inclusive, trimmed of surrounding whitespace.
/// Runs of terminators ("...", "?!") stay with the preceding sentence.
pub(crate) fn sentence_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut start = 0usize;
    let mut iter = text.char_indices().peekable();
    while let Some((i, c)) = iter.next() {
        if matches!(c, '.' | '!' | '?' | '\n') {
            let mut end = i + c.len_utf8();
            while let Some(&(j, d)) = iter.peek() {
                if matches!(d, '.' | '!' | '?' | '\n') {
                    end = j + d.len_utf8();
                    iter.next();
                } else {
                    break;
                }
            }
            if let Some(span) = trimmed(text, start, end) {
                spans.push(span);
            }
            start = end;
        }
    }
    if let Some(span) = trimmed(text, start, text.len()) {
        spans.push(span);
    }
    spans
}

pub(crate) fn paragraph_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut start = 0usize;
    while let Some(pos) = text[start..].find("\n\n") {
        let end = start + pos;
        if let Some(span) = trimmed(text, start, end) {
            spans.push(span);
        }
        start = end + 2;
    }
    if let Some(span) = trimmed(text, start, text.len()) {
        spans.push(span);
    }
    spans
}

fn trimmed(text: &str, start: usize, end: usize) -> Option<Span> {
    let slice = &text[start..end];
    let lead = slice.len() - slice.trim_start().len();
    let body = slice.trim();
    if body.is_empty() {
        return None;
    }
    let s = start + lead;
    Some(Span { start: s, end: s + body.len() })
}

fn floor_boundary(text: &str, mut i: usize) -> usize {
    i = i.min(text.len());
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_boundary(text: &str, mut i: usize) -> usize {
    let n = text.len();
    if i >= n {
        return n;
    }
    while !text.is_char_boundary(i) {
        i += 1;
    }
    i
}
