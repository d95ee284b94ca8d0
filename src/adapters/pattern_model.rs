//! Rule-based entity model shipped inside the model archive.
//!
//! The archive's `model/` directory carries an entity-ruler pattern file in the
//! spaCy JSONL format, one pattern per line:
//!
//! ```text
//! {"label": "COCKTAIL", "pattern": "Old Fashioned"}
//! {"label": "QUANTITY", "pattern": [{"TEXT": {"REGEX": "^\\d+(ml|cl|oz)$"}}]}
//! {"label": "ING", "pattern": [{"LOWER": {"IN": ["gin", "rum", "tequila"]}}]}
//! ```
//!
//! String patterns are phrases matched token by token; list patterns describe
//! one token per object. Overlapping matches resolve to the longest span, and
//! the earlier span wins ties.

use crate::domain::model::{Entity, EntityLabel};
use crate::domain::ports::{EntityRecognizer, ModelLoader};
use crate::utils::error::{EtlError, Result};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

pub const PATTERNS_FILE: &str = "patterns.jsonl";
pub const ENTITY_RULER_DIR: &str = "entity_ruler";

const PREFIXES: &[char] = &['"', '\'', '(', '[', '{'];
const SUFFIXES: &[char] = &['.', ',', '!', '?', ';', ':', ')', ']', '}', '"', '\''];
const NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "half", "dozen",
];

/// Token attribute that phrase patterns are compared on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PhraseAttr {
    #[default]
    Orth,
    Lower,
}

#[derive(Debug, Deserialize)]
struct PatternLine {
    label: String,
    pattern: PatternSpec,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PatternSpec {
    Phrase(String),
    Tokens(Vec<Map<String, Value>>),
}

#[derive(Debug, Default, Deserialize)]
struct RulerCfg {
    #[serde(default)]
    phrase_matcher_attr: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ModelMeta {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Clone)]
enum ValueMatcher {
    Exact(String),
    Regex(Regex),
    In(Vec<String>),
}

impl ValueMatcher {
    fn matches(&self, value: &str) -> bool {
        match self {
            ValueMatcher::Exact(expected) => expected == value,
            ValueMatcher::Regex(re) => re.is_match(value),
            ValueMatcher::In(options) => options.iter().any(|o| o == value),
        }
    }
}

#[derive(Debug, Clone)]
enum TokenCondition {
    Text(PhraseAttr, ValueMatcher),
    LikeNum(bool),
    IsDigit(bool),
}

#[derive(Debug, Clone)]
struct Pattern {
    label: EntityLabel,
    tokens: Vec<Vec<TokenCondition>>,
}

#[derive(Debug, Clone, Copy)]
struct Token<'t> {
    text: &'t str,
    start: usize,
    end: usize,
}

impl Token<'_> {
    fn satisfies(&self, condition: &TokenCondition) -> bool {
        match condition {
            TokenCondition::Text(PhraseAttr::Orth, matcher) => matcher.matches(self.text),
            TokenCondition::Text(PhraseAttr::Lower, matcher) => {
                matcher.matches(&self.text.to_lowercase())
            }
            TokenCondition::LikeNum(expected) => like_num(self.text) == *expected,
            TokenCondition::IsDigit(expected) => {
                let is_digit =
                    !self.text.is_empty() && self.text.chars().all(|c| c.is_ascii_digit());
                is_digit == *expected
            }
        }
    }
}

/// Splits on whitespace, then peels opening punctuation off the front and
/// closing punctuation off the back of each word.
fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut word_start = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(start) = word_start.take() {
                push_word(text, start, i, &mut tokens);
            }
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    if let Some(start) = word_start {
        push_word(text, start, text.len(), &mut tokens);
    }

    tokens
}

fn push_word<'t>(text: &'t str, mut start: usize, mut end: usize, tokens: &mut Vec<Token<'t>>) {
    let token = |start: usize, end: usize| Token {
        text: &text[start..end],
        start,
        end,
    };

    // prefix and suffix characters are all single-byte ASCII
    while start < end && text[start..end].starts_with(PREFIXES) {
        tokens.push(token(start, start + 1));
        start += 1;
    }

    let mut suffixes = Vec::new();
    while end > start && text[start..end].ends_with(SUFFIXES) {
        suffixes.push(token(end - 1, end));
        end -= 1;
    }

    if start < end {
        tokens.push(token(start, end));
    }
    tokens.extend(suffixes.into_iter().rev());
}

fn like_num(text: &str) -> bool {
    let text = text.trim_start_matches(['+', '-', '~']);
    let digits: String = text.chars().filter(|c| *c != ',' && *c != '.').collect();
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    if let Some((num, den)) = text.split_once('/') {
        let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
        if all_digits(num) && all_digits(den) {
            return true;
        }
    }
    NUMBER_WORDS.contains(&text.to_lowercase().as_str())
}

/// Entity ruler loaded from a model directory.
#[derive(Debug, Clone)]
pub struct PatternModel {
    name: String,
    patterns: Vec<Pattern>,
}

impl PatternModel {
    /// Loads `entity_ruler/patterns.jsonl` (or `patterns.jsonl`) plus the
    /// optional `entity_ruler/cfg` and `meta.json`.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let patterns_path = [
            model_dir.join(ENTITY_RULER_DIR).join(PATTERNS_FILE),
            model_dir.join(PATTERNS_FILE),
        ]
        .into_iter()
        .find(|p| p.is_file())
        .ok_or_else(|| {
            EtlError::model(format!("no {} found in {}", PATTERNS_FILE, model_dir.display()))
        })?;

        let cfg: RulerCfg = read_optional_json(&model_dir.join(ENTITY_RULER_DIR).join("cfg"))?;
        let phrase_attr = match cfg.phrase_matcher_attr.as_deref() {
            None | Some("ORTH") | Some("TEXT") => PhraseAttr::Orth,
            Some("LOWER") => PhraseAttr::Lower,
            Some(other) => {
                return Err(EtlError::model(format!(
                    "unsupported phrase_matcher_attr '{}'",
                    other
                )))
            }
        };

        let content = fs::read_to_string(&patterns_path)?;
        let mut model = Self::from_patterns(&content, phrase_attr).map_err(|e| match e {
            EtlError::ModelError { message } => {
                EtlError::model(format!("{}: {}", patterns_path.display(), message))
            }
            other => other,
        })?;

        let meta: ModelMeta = read_optional_json(&model_dir.join("meta.json"))?;
        model.name = match (meta.name, meta.version) {
            (Some(name), Some(version)) => format!("{}-{}", name, version),
            (Some(name), None) => name,
            _ => model_dir.display().to_string(),
        };

        tracing::info!(
            "Loaded model {} with {} patterns",
            model.name,
            model.patterns.len()
        );
        Ok(model)
    }

    /// Compiles JSONL pattern lines. Blank lines and `#` or `//` comments are skipped.
    pub fn from_patterns(content: &str, phrase_attr: PhraseAttr) -> Result<Self> {
        let mut patterns = Vec::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }
            let at_line =
                |message: String| EtlError::model(format!("line {}: {}", idx + 1, message));

            let parsed: PatternLine =
                serde_json::from_str(line).map_err(|e| at_line(e.to_string()))?;
            let tokens = match parsed.pattern {
                PatternSpec::Phrase(phrase) => phrase_tokens(&phrase, phrase_attr),
                PatternSpec::Tokens(specs) => specs
                    .iter()
                    .map(token_conditions)
                    .collect::<std::result::Result<Vec<_>, String>>()
                    .map_err(at_line)?,
            };
            if tokens.is_empty() {
                return Err(at_line("pattern matches no tokens".to_string()));
            }

            patterns.push(Pattern {
                label: EntityLabel::from_model_label(&parsed.label),
                tokens,
            });
        }

        Ok(Self {
            name: "patterns".to_string(),
            patterns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    fn match_at(pattern: &Pattern, tokens: &[Token<'_>], start: usize) -> bool {
        tokens.len() - start >= pattern.tokens.len()
            && pattern
                .tokens
                .iter()
                .zip(&tokens[start..])
                .all(|(conditions, token)| conditions.iter().all(|c| token.satisfies(c)))
    }
}

impl EntityRecognizer for PatternModel {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>> {
        let tokens = tokenize(text);

        // (start, end, pattern index)
        let mut candidates = Vec::new();
        for (idx, pattern) in self.patterns.iter().enumerate() {
            for start in 0..tokens.len() {
                if Self::match_at(pattern, &tokens, start) {
                    candidates.push((start, start + pattern.tokens.len(), idx));
                }
            }
        }
        candidates.sort_by(|a, b| {
            (b.1 - b.0)
                .cmp(&(a.1 - a.0))
                .then(a.0.cmp(&b.0))
                .then(a.2.cmp(&b.2))
        });

        let mut taken = vec![false; tokens.len()];
        let mut spans = Vec::new();
        for (start, end, idx) in candidates {
            if taken[start..end].iter().any(|t| *t) {
                continue;
            }
            taken[start..end].iter_mut().for_each(|t| *t = true);
            spans.push((start, end, idx));
        }
        spans.sort_by_key(|span| span.0);

        Ok(spans
            .into_iter()
            .map(|(start, end, idx)| {
                Entity::new(
                    self.patterns[idx].label.clone(),
                    &text[tokens[start].start..tokens[end - 1].end],
                )
            })
            .collect())
    }
}

/// Loads [`PatternModel`]s from provisioned model directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternModelLoader;

impl ModelLoader for PatternModelLoader {
    type Model = PatternModel;

    fn load(&self, model_dir: &Path) -> Result<PatternModel> {
        PatternModel::load(model_dir)
    }
}

fn phrase_tokens(phrase: &str, attr: PhraseAttr) -> Vec<Vec<TokenCondition>> {
    tokenize(phrase)
        .into_iter()
        .map(|token| {
            let text = match attr {
                PhraseAttr::Orth => token.text.to_string(),
                PhraseAttr::Lower => token.text.to_lowercase(),
            };
            vec![TokenCondition::Text(attr, ValueMatcher::Exact(text))]
        })
        .collect()
}

fn token_conditions(spec: &Map<String, Value>) -> std::result::Result<Vec<TokenCondition>, String> {
    spec.iter()
        .map(|(attr, value)| match attr.as_str() {
            "ORTH" | "TEXT" => Ok(TokenCondition::Text(PhraseAttr::Orth, value_matcher(value)?)),
            "LOWER" => Ok(TokenCondition::Text(PhraseAttr::Lower, value_matcher(value)?)),
            "LIKE_NUM" => bool_value(attr, value).map(TokenCondition::LikeNum),
            "IS_DIGIT" => bool_value(attr, value).map(TokenCondition::IsDigit),
            other => Err(format!("unsupported token attribute '{}'", other)),
        })
        .collect()
}

fn value_matcher(value: &Value) -> std::result::Result<ValueMatcher, String> {
    match value {
        Value::String(s) => Ok(ValueMatcher::Exact(s.clone())),
        Value::Object(obj) => match (obj.get("REGEX"), obj.get("IN")) {
            (Some(Value::String(re)), None) => Regex::new(re)
                .map(ValueMatcher::Regex)
                .map_err(|e| format!("invalid REGEX: {}", e)),
            (None, Some(Value::Array(items))) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| "IN values must be strings".to_string())
                })
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(ValueMatcher::In),
            _ => Err(format!("unsupported value predicate {}", value)),
        },
        other => Err(format!("unsupported attribute value {}", other)),
    }
}

fn bool_value(attr: &str, value: &Value) -> std::result::Result<bool, String> {
    value
        .as_bool()
        .ok_or_else(|| format!("{} expects a boolean", attr))
}

fn read_optional_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.is_file() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}
