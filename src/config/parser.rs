//! Line-oriented parser for module files.
//!
//! Format:
//! ```text
//! ; comment
//! path <canonical-directory>
//! reference <reference-directory>
//! module <base-name>
//! ```
//!
//! `path` and `reference` set the context for every following `module`
//! until overridden. Lines with any other keyword are ignored.
use crate::error::ConfigWarning;
use crate::logging::Log;
use crate::paths::strip_trailing_separators;

use super::{ModuleMap, ParseWarning, ParsedConfig};

/// A recognised directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive<'a> {
    Path(&'a str),
    Reference(&'a str),
    Module(&'a str),
}

/// Split a trimmed line into its keyword and value and match the keyword.
///
/// The keyword runs up to the first space or tab; the value is the rest of
/// the line with surrounding spaces and tabs removed.
fn directive(line: &str) -> Option<Directive<'_>> {
    let (keyword, value) = line
        .split_once([' ', '\t'])
        .map_or((line, ""), |(k, v)| (k, trim_blanks(v)));
    match keyword {
        "reference" => Some(Directive::Reference(value)),
        "path" => Some(Directive::Path(value)),
        "module" => Some(Directive::Module(value)),
        _ => None,
    }
}

fn trim_blanks(s: &str) -> &str {
    s.trim_matches([' ', '\t'])
}

/// Parse module file content into a [`ParsedConfig`].
///
/// Never fails: unusable `module` lines are dropped and recorded as
/// warnings, comments and unknown lines are skipped.
///
/// # Examples
///
/// ```
/// use libdist::config::parse_str;
/// use libdist::logging::{BufferedLog, Logger};
/// use std::sync::Arc;
///
/// let log = BufferedLog::new(Arc::new(Logger::with_log_file(None)));
/// let parsed = parse_str("path lib\\core\nreference src\\app\nmodule foo\n", &log);
/// assert_eq!(parsed.modules.modules("lib\\core", "src\\app").unwrap(), ["foo"]);
/// assert!(parsed.warnings.is_empty());
/// ```
pub fn parse_str(content: &str, log: &dyn Log) -> ParsedConfig {
    let mut modules = ModuleMap::default();
    let mut warnings = Vec::new();
    let mut path = "";
    let mut reference = "";

    for (index, raw) in content.lines().enumerate() {
        let line_num = index + 1;
        let line = trim_blanks(raw);

        if line.is_empty() {
            continue;
        }
        if line.starts_with(';') {
            log.notice(&format!("skipping comment on line {line_num}"));
            continue;
        }

        let warning = match directive(line) {
            Some(Directive::Reference(value)) => {
                reference = strip_trailing_separators(value);
                log.info(&format!("found reference: {value}"));
                None
            }
            Some(Directive::Path(value)) => {
                path = strip_trailing_separators(value);
                log.info(&format!("found path: {value}"));
                None
            }
            Some(Directive::Module(name)) => {
                add_module(&mut modules, path, reference, name, log)
            }
            None => {
                log.debug(&format!("ignoring line {line_num}: {line}"));
                None
            }
        };

        if let Some(warning) = warning {
            log.warn(&format!("line {line_num}: {warning}"));
            warnings.push(ParseWarning {
                line: line_num,
                warning,
            });
        }
    }

    ParsedConfig { modules, warnings }
}

fn add_module(
    modules: &mut ModuleMap,
    path: &str,
    reference: &str,
    name: &str,
    log: &dyn Log,
) -> Option<ConfigWarning> {
    if name.is_empty() {
        return Some(ConfigWarning::EmptyModuleName);
    }
    if path.is_empty() || reference.is_empty() {
        return Some(ConfigWarning::ModuleWithoutContext {
            module: name.to_string(),
        });
    }
    if !modules.insert(path, reference, name) {
        return Some(ConfigWarning::DuplicateModule {
            path: path.to_string(),
            reference: reference.to_string(),
            module: name.to_string(),
        });
    }
    log.info(&format!("found module: {name}"));
    None
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::{BufferedLog, LogEntry, Logger};
    use std::sync::Arc;

    fn parse(content: &str) -> (ParsedConfig, Vec<LogEntry>) {
        let log = BufferedLog::new(Arc::new(Logger::with_log_file(None)));
        let parsed = parse_str(content, &log);
        (parsed, log.entries())
    }

    #[test]
    fn groups_modules_under_path_and_reference() {
        let (parsed, _) = parse("path lib\\core\nreference src\\app\nmodule foo\nmodule bar\n");
        let paths: Vec<&str> = parsed.modules.paths().collect();
        assert_eq!(paths, ["lib\\core"]);
        assert_eq!(parsed.modules.groups().count(), 1);
        assert_eq!(
            parsed.modules.modules("lib\\core", "src\\app").unwrap(),
            ["foo", "bar"]
        );
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn module_before_context_is_rejected_with_warning() {
        let (parsed, entries) = parse("module early\npath lib\nreference app\nmodule late\n");
        assert_eq!(parsed.modules.module_count(), 1);
        assert_eq!(parsed.modules.modules("lib", "app").unwrap(), ["late"]);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].line, 1);
        assert!(matches!(
            parsed.warnings[0].warning,
            ConfigWarning::ModuleWithoutContext { .. }
        ));
        assert!(
            entries
                .iter()
                .any(|e| matches!(e, LogEntry::Warn(m) if m.contains("'early'")))
        );
    }

    #[test]
    fn module_with_only_path_is_rejected() {
        let (parsed, _) = parse("path lib\nmodule foo\n");
        assert!(parsed.modules.is_empty());
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn context_carries_over_until_overridden() {
        let (parsed, _) = parse(
            "path lib\\core\nreference src\\a\nmodule foo\nreference src\\b\nmodule foo\n\
             path lib\\net\nmodule socket\n",
        );
        assert_eq!(parsed.modules.modules("lib\\core", "src\\a").unwrap(), ["foo"]);
        assert_eq!(parsed.modules.modules("lib\\core", "src\\b").unwrap(), ["foo"]);
        assert_eq!(parsed.modules.modules("lib\\net", "src\\b").unwrap(), ["socket"]);
    }

    #[test]
    fn comments_are_notices() {
        let (parsed, entries) = parse("; header\n  ;indented comment\n");
        assert!(parsed.modules.is_empty());
        let notices = entries
            .iter()
            .filter(|e| matches!(e, LogEntry::Notice(_)))
            .count();
        assert_eq!(notices, 2);
    }

    #[test]
    fn blank_and_whitespace_lines_are_ignored() {
        let (parsed, entries) = parse("\n\t\n   \npath lib\n\nreference app\nmodule foo\n");
        assert_eq!(parsed.modules.module_count(), 1);
        assert!(!entries.iter().any(|e| matches!(e, LogEntry::Warn(_))));
    }

    #[test]
    fn values_are_trimmed_and_tabs_accepted() {
        let (parsed, _) = parse("path\t\tlib\\core  \nreference   src\\app\t\nmodule \t foo \n");
        assert_eq!(
            parsed.modules.modules("lib\\core", "src\\app").unwrap(),
            ["foo"]
        );
    }

    #[test]
    fn trailing_separators_are_stripped_from_keys() {
        let (parsed, _) = parse("path lib/core/\nreference src\\app\\\\\nmodule foo\n");
        assert!(parsed.modules.modules("lib/core", "src\\app").is_some());
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let (parsed, _) = parse("path lib\r\nreference app\r\nmodule foo\r\n");
        assert_eq!(parsed.modules.modules("lib", "app").unwrap(), ["foo"]);
    }

    #[test]
    fn keywords_must_match_exactly() {
        let (parsed, entries) = parse("path lib\nreference app\nmodule xpath\nmodules foo\npathway x\n");
        assert_eq!(parsed.modules.modules("lib", "app").unwrap(), ["xpath"]);
        assert!(parsed.warnings.is_empty());
        let ignored = entries
            .iter()
            .filter(|e| matches!(e, LogEntry::Debug(m) if m.starts_with("ignoring line")))
            .count();
        assert_eq!(ignored, 2);
    }

    #[test]
    fn module_name_containing_keyword_is_not_misread() {
        let (parsed, _) = parse("path lib\nreference app\nmodule reference_path\n");
        assert_eq!(
            parsed.modules.modules("lib", "app").unwrap(),
            ["reference_path"]
        );
    }

    #[test]
    fn empty_module_name_is_rejected() {
        let (parsed, _) = parse("path lib\nreference app\nmodule\nmodule   \n");
        assert!(parsed.modules.is_empty());
        assert_eq!(parsed.warnings.len(), 2);
        assert!(
            parsed
                .warnings
                .iter()
                .all(|w| w.warning == ConfigWarning::EmptyModuleName)
        );
    }

    #[test]
    fn duplicate_module_is_reported_once_and_not_added() {
        let (parsed, _) = parse("path lib\nreference app\nmodule foo\nmodule foo\n");
        assert_eq!(parsed.modules.modules("lib", "app").unwrap(), ["foo"]);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].line, 4);
        assert!(matches!(
            parsed.warnings[0].warning,
            ConfigWarning::DuplicateModule { .. }
        ));
    }

    #[test]
    fn empty_path_value_clears_context() {
        let (parsed, _) = parse("path lib\nreference app\npath\nmodule foo\n");
        assert!(parsed.modules.is_empty());
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn found_directives_are_logged() {
        let (_, entries) = parse("path lib\\core\nreference src\\app\nmodule foo\n");
        let infos: Vec<&str> = entries
            .iter()
            .filter(|e| matches!(e, LogEntry::Info(_)))
            .map(LogEntry::message)
            .collect();
        assert_eq!(
            infos,
            [
                "found path: lib\\core",
                "found reference: src\\app",
                "found module: foo",
            ]
        );
    }
}
