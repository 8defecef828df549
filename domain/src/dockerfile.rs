//! Dockerfile instruction grammar.
//!
//! A deliberately small check, used to refuse obviously broken generated
//! Dockerfiles before they reach `docker build`:
//!
//! - blank lines and `#` comments are skipped
//! - a trailing `\` joins the next line into the same instruction
//! - the first word is the instruction keyword (case-insensitive) and must be
//!   one of [`INSTRUCTIONS`]
//! - a `key=value` line before the first `FROM` is accepted as a parser
//!   directive or build argument
//! - at least one `FROM` is required

use thiserror::Error;

/// Instruction keywords accepted by the grammar.
pub const INSTRUCTIONS: &[&str] = &[
    "FROM",
    "RUN",
    "CMD",
    "LABEL",
    "EXPOSE",
    "ENV",
    "ADD",
    "COPY",
    "ENTRYPOINT",
    "VOLUME",
    "USER",
    "WORKDIR",
    "ARG",
    "ONBUILD",
    "STOPSIGNAL",
    "HEALTHCHECK",
    "SHELL",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DockerfileError {
    /// `line` is 1-based and points at the first physical line of the instruction.
    #[error("invalid instruction on line {line}: {instruction}")]
    InvalidInstruction { line: usize, instruction: String },

    #[error("Dockerfile must have a FROM instruction")]
    MissingFrom,
}

/// A logical instruction after continuation joining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub line: usize,
    /// Upper-cased keyword
    pub keyword: String,
    pub text: String,
}

/// Split content into logical instructions, skipping blanks and comments.
pub fn instructions(content: &str) -> Vec<Instruction> {
    let lines: Vec<&str> = content.lines().collect();
    let mut out = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let start = i;
        let mut text = lines[i].trim().to_string();
        i += 1;

        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        while text.ends_with('\\') && i < lines.len() {
            text.pop();
            let next = lines[i].trim();
            i += 1;
            // Blank and comment lines inside a continuation are skipped
            if next.is_empty() || next.starts_with('#') {
                text.push('\\');
                continue;
            }
            text.push(' ');
            text.push_str(next);
        }

        let keyword = text
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();
        out.push(Instruction {
            line: start + 1,
            keyword,
            text,
        });
    }

    out
}

/// Validate Dockerfile content against the instruction grammar.
pub fn validate_dockerfile(content: &str) -> Result<(), DockerfileError> {
    let mut has_from = false;

    for instruction in instructions(content) {
        if instruction.keyword == "FROM" {
            has_from = true;
        }

        if !INSTRUCTIONS.contains(&instruction.keyword.as_str()) {
            if !has_from && instruction.text.contains('=') {
                continue;
            }
            return Err(DockerfileError::InvalidInstruction {
                line: instruction.line,
                instruction: instruction.keyword,
            });
        }
    }

    if has_from {
        Ok(())
    } else {
        Err(DockerfileError::MissingFrom)
    }
}
