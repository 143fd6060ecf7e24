// src/filter.rs

use crate::error::{Error, Result};
use crate::languages::LanguageTable;
use regex::Regex;
use tracing::warn;

/// Shell-style pattern matched against the whole slash-separated path.
///
/// `*` matches any run of non-`/` characters, `?` a single non-`/`
/// character, `[...]` a character class (`^` negates, `a-z` ranges) and `\`
/// quotes the next character.
#[derive(Debug, Clone)]
pub struct Glob {
    regex: Regex,
}

impl Glob {
    pub fn new(pattern: &str) -> Result<Self> {
        let bad = || Error::Configuration(format!("invalid glob '{}'", pattern));
        let mut re = String::from("^");
        let mut chars = pattern.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '*' => re.push_str("[^/]*"),
                '?' => re.push_str("[^/]"),
                '\\' => {
                    let quoted = chars.next().ok_or_else(bad)?;
                    re.push_str(&regex::escape(&quoted.to_string()));
                }
                '[' => {
                    let negated = chars.next_if_eq(&'^').is_some();
                    let mut ranges = Vec::new();
                    let mut members = 0;
                    loop {
                        let lo = match chars.next().ok_or_else(bad)? {
                            ']' if members > 0 => break,
                            ']' => return Err(bad()),
                            '\\' => chars.next().ok_or_else(bad)?,
                            other => other,
                        };
                        members += 1;
                        let mut hi = lo;
                        let mut ahead = chars.clone();
                        if ahead.next() == Some('-') && ahead.peek().map_or(false, |n| *n != ']') {
                            chars.next();
                            hi = match chars.next().ok_or_else(bad)? {
                                '\\' => chars.next().ok_or_else(bad)?,
                                other => other,
                            };
                        }
                        // reversed ranges hold nothing
                        if lo <= hi {
                            ranges.push((lo, hi));
                        }
                    }
                    push_class(&mut re, negated, &ranges);
                }
                other => re.push_str(&regex::escape(&other.to_string())),
            }
        }
        re.push('$');
        let regex = Regex::new(&re).map_err(|_| bad())?;
        Ok(Glob { regex })
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

fn push_class(re: &mut String, negated: bool, ranges: &[(char, char)]) {
    if ranges.is_empty() {
        re.push_str(if negated { "(?s:.)" } else { r"[^\x00-\x{10FFFF}]" });
        return;
    }
    re.push('[');
    if negated {
        re.push('^');
    }
    for &(lo, hi) in ranges {
        push_class_char(re, lo);
        if lo != hi {
            re.push('-');
            push_class_char(re, hi);
        }
    }
    re.push(']');
}

fn push_class_char(re: &mut String, c: char) {
    if matches!(c, '\\' | '[' | ']' | '^' | '-' | '&' | '~') {
        re.push('\\');
    }
    re.push(c);
}

/// Path selection options, as given on the command line
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub extensions: Vec<String>,
    pub languages: Vec<String>,
    pub exclude: Vec<String>,
    pub restrict_to: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FileFilter {
    any_extension: bool,
    extensions: Vec<String>,
    exclude: Vec<Glob>,
    restrict_to: Vec<Glob>,
}

impl FileFilter {
    /// Fails on the first invalid glob; unknown languages are only warned about.
    pub fn new(options: &FilterOptions, languages: &LanguageTable) -> Result<Self> {
        let mut extensions = options.extensions.clone();
        for language in &options.languages {
            match languages.extensions(language) {
                Some(exts) => extensions.extend(exts.iter().cloned()),
                None => warn!(language = %language, "unknown language, ignoring"),
            }
        }
        let compile = |patterns: &[String]| -> Result<Vec<Glob>> {
            patterns.iter().map(|p| Glob::new(p)).collect()
        };

        Ok(FileFilter {
            any_extension: options.extensions.is_empty() && options.languages.is_empty(),
            extensions,
            exclude: compile(&options.exclude)?,
            restrict_to: compile(&options.restrict_to)?,
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        let extension =
            self.any_extension || self.extensions.iter().any(|ext| path.ends_with(ext.as_str()));
        let excluded = self.exclude.iter().any(|g| g.is_match(path));
        let restricted =
            self.restrict_to.is_empty() || self.restrict_to.iter().any(|g| g.is_match(path));
        extension && !excluded && restricted
    }

    pub fn apply(&self, files: Vec<String>) -> Vec<String> {
        files.into_iter().filter(|f| self.matches(f)).collect()
    }
}
