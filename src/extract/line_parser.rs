// ==========================================
// PSA Extraction & Validation Engine - Line Parser
// ==========================================
// Decodes raw PSA bytes and splits them into delimited records.
// The PSA export convention: utf-8 with a cp1252 fallback, a
// fixed header block, comma delimiters with backslash escapes.
// ==========================================

use tracing::debug;

use crate::domain::RawRecord;

// ==========================================
// ParserSettings
// ==========================================
#[derive(Debug, Clone)]
pub struct ParserSettings {
    pub header_lines: usize, // leading lines skipped before record data
}

impl Default for ParserSettings {
    fn default() -> Self {
        ParserSettings { header_lines: 3 }
    }
}

// ==========================================
// LineParser
// ==========================================
pub struct LineParser {
    settings: ParserSettings,
}

impl LineParser {
    pub fn new(settings: ParserSettings) -> Self {
        LineParser { settings }
    }

    /// Parse raw PSA bytes into records. Source line numbers are
    /// one-based over the whole file, header block included. Blank
    /// lines are ignored.
    pub fn parse(&self, bytes: &[u8]) -> Vec<RawRecord> {
        let content = decode_psa_bytes(bytes);
        let mut records = Vec::new();

        for (i, line) in content.split('\n').enumerate() {
            if i < self.settings.header_lines {
                continue;
            }
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.trim().is_empty() {
                continue;
            }
            records.push(RawRecord::new(split_fields(line), i + 1));
        }

        debug!(records = records.len(), "parsed PSA content");
        records
    }
}

/// Decode PSA bytes: utf-8 when valid, Windows-1252 otherwise. The
/// fallback maps every byte to a char, so decoding never fails.
pub fn decode_psa_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| cp1252_char(b)).collect(),
    }
}

// 0x80..=0x9F carry the Windows-1252 graphics characters; code points
// undefined there (0x81, 0x8D, 0x8F, 0x90, 0x9D) keep the Latin-1
// identity, as do all other bytes.
fn cp1252_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        other => other as char,
    }
}

/// Escape-aware field splitter. `\,` encodes a literal comma, any
/// other `\x` yields `x`, and a trailing lone backslash is kept. The
/// final field is emitted when it is non-empty or when the line ends
/// with a comma.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            ',' => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    if !current.is_empty() || line.ends_with(',') {
        fields.push(current);
    }

    fields
}
