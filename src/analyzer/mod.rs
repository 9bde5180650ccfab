//! Built-in pattern analyzer.
//!
//! A deterministic, language-aware heuristic scanner producing line-level
//! findings. This is not a real static-analysis engine: each ruleset is a
//! small set of textual triggers over the physical lines of the submission.
//! The analyzer performs no I/O and cannot fail; the worst case is an empty
//! findings list.

use regex::Regex;
use std::sync::OnceLock;

use crate::types::{CodeComment, CodeSubmission, CommentType};

/// Ruleset family selected from the submission's declared language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ruleset {
    JavaScript,
    Python,
    Java,
    Cpp,
    Generic,
}

impl Ruleset {
    /// Select a ruleset by normalized lowercase language name. Unrecognized
    /// languages fall back to the generic ruleset.
    fn for_language(language: &str) -> Self {
        match language.trim().to_lowercase().as_str() {
            "javascript" | "js" | "typescript" | "ts" | "jsx" | "tsx" | "node" => Self::JavaScript,
            "python" | "py" => Self::Python,
            "java" => Self::Java,
            "c++" | "cpp" | "cc" | "cxx" => Self::Cpp,
            _ => Self::Generic,
        }
    }
}

fn mutable_default_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"def\s+\w+\s*\([^)]*=\s*\[\s*\]").expect("valid pattern"))
}

fn literal_concat_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"["'][^"']*["']\s*\+\s*["']"#).expect("valid pattern"))
}

fn raw_pointer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-Za-z_]\w*\s*\*\s*[A-Za-z_]\w*\s*[=;)]").expect("valid pattern"))
}

/// Analyze a submission, producing line-level findings.
///
/// Pure function of (language, code): identical inputs always yield the
/// identical findings list. An empty or whitespace-only submission
/// short-circuits to a single synthetic error at line 1.
pub fn analyze(submission: &CodeSubmission) -> Vec<CodeComment> {
    if submission.code.trim().is_empty() {
        return vec![CodeComment::new(1, "Code is empty", CommentType::Error)];
    }

    let ruleset = Ruleset::for_language(&submission.language);
    let mut findings = Vec::new();

    for (idx, line) in submission.code.lines().enumerate() {
        let lineno = (idx + 1) as u32;
        match ruleset {
            Ruleset::JavaScript => scan_javascript(lineno, line, &mut findings),
            Ruleset::Python => scan_python(lineno, line, &mut findings),
            Ruleset::Java => scan_java(lineno, line, &mut findings),
            Ruleset::Cpp => scan_cpp(lineno, line, &mut findings),
            Ruleset::Generic => scan_generic(lineno, line, &mut findings),
        }
    }

    findings
}

fn scan_javascript(lineno: u32, line: &str, findings: &mut Vec<CodeComment>) {
    if line.contains("console.log") {
        findings.push(CodeComment::new(
            lineno,
            "Avoid console.log statements in production code",
            CommentType::Warning,
        ));
    }

    let trimmed = line.trim_start();
    if trimmed.starts_with("var ") {
        findings.push(
            CodeComment::new(
                lineno,
                "Prefer block-scoped 'const' or 'let' over 'var'",
                CommentType::Suggestion,
            )
            .with_suggestion(line.replacen("var ", "const ", 1)),
        );
    }

    // Loose equality; lines already using a strict operator are left alone
    // ("!==" contains "==", so strictness is checked first).
    let has_strict = line.contains("===") || line.contains("!==");
    if !has_strict {
        if line.contains("==") {
            findings.push(
                CodeComment::new(
                    lineno,
                    "Use strict equality '===' instead of loose equality '=='",
                    CommentType::Warning,
                )
                .with_suggestion(line.replace("==", "===")),
            );
        } else if line.contains("!=") {
            findings.push(
                CodeComment::new(
                    lineno,
                    "Use strict inequality '!==' instead of loose inequality '!='",
                    CommentType::Warning,
                )
                .with_suggestion(line.replace("!=", "!==")),
            );
        }
    }
}

fn scan_python(lineno: u32, line: &str, findings: &mut Vec<CodeComment>) {
    if line.contains("print(") {
        findings.push(CodeComment::new(
            lineno,
            "Consider using the logging module instead of print",
            CommentType::Suggestion,
        ));
    }

    if mutable_default_re().is_match(line) {
        findings.push(CodeComment::new(
            lineno,
            "Mutable default argument: the default list is shared across calls",
            CommentType::Warning,
        ));
    }

    if literal_concat_re().is_match(line) {
        findings.push(CodeComment::new(
            lineno,
            "Prefer an f-string over '+' concatenation of string literals",
            CommentType::Suggestion,
        ));
    }
}

fn scan_java(lineno: u32, line: &str, findings: &mut Vec<CodeComment>) {
    if line.contains("System.out.println") {
        findings.push(CodeComment::new(
            lineno,
            "Use a logger instead of System.out.println",
            CommentType::Suggestion,
        ));
    }

    if line.contains("== null") || line.contains("!= null") {
        findings.push(CodeComment::new(
            lineno,
            "Consider Optional instead of an explicit null comparison",
            CommentType::Suggestion,
        ));
    }
}

fn scan_cpp(lineno: u32, line: &str, findings: &mut Vec<CodeComment>) {
    if line.contains("using namespace") {
        findings.push(CodeComment::new(
            lineno,
            "Avoid 'using namespace' directives at global scope",
            CommentType::Warning,
        ));
    }

    if raw_pointer_re().is_match(line) {
        findings.push(CodeComment::new(
            lineno,
            "Raw pointer declaration: consider a smart pointer or a reference",
            CommentType::Suggestion,
        ));
    }
}

fn scan_generic(lineno: u32, line: &str, findings: &mut Vec<CodeComment>) {
    if line.chars().count() > 100 {
        findings.push(CodeComment::new(
            lineno,
            "Line exceeds 100 characters",
            CommentType::Suggestion,
        ));
    }

    if line.trim_end() != line {
        findings.push(
            CodeComment::new(lineno, "Trailing whitespace", CommentType::Info)
                .with_suggestion(line.trim_end()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReviewType;

    fn submission(language: &str, code: &str) -> CodeSubmission {
        CodeSubmission::new(language, ReviewType::Comprehensive, code)
    }

    #[test]
    fn test_empty_code_short_circuits() {
        for code in ["", "   ", "\n\n\t  \n"] {
            let findings = analyze(&submission("JavaScript", code));
            assert_eq!(findings.len(), 1, "code {:?}", code);
            assert_eq!(findings[0].line, 1);
            assert_eq!(findings[0].text, "Code is empty");
            assert_eq!(findings[0].comment_type, CommentType::Error);
        }
    }

    #[test]
    fn test_analyze_is_pure() {
        let sub = submission("Python", "print('x')\ndef f(items=[]):\n    pass\n");
        let first = analyze(&sub);
        let second = analyze(&sub);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_javascript_triggers() {
        let code = "var x = 1;\nif (x == 1) { console.log(x); }";
        let findings = analyze(&submission("JavaScript", code));

        let var_finding = findings
            .iter()
            .find(|f| f.line == 1 && f.comment_type == CommentType::Suggestion)
            .expect("var finding");
        assert_eq!(var_finding.suggestion.as_deref(), Some("const x = 1;"));

        let eq_finding = findings
            .iter()
            .find(|f| f.line == 2 && f.text.contains("strict equality"))
            .expect("loose equality finding");
        assert_eq!(eq_finding.comment_type, CommentType::Warning);
        assert!(eq_finding.suggestion.as_deref().unwrap().contains("==="));

        assert!(findings
            .iter()
            .any(|f| f.line == 2
                && f.comment_type == CommentType::Warning
                && f.text.contains("console.log")));
    }

    #[test]
    fn test_javascript_strict_equality_not_flagged() {
        let findings = analyze(&submission("typescript", "if (x === 1) { y(); }"));
        assert!(findings.is_empty());

        let findings = analyze(&submission("typescript", "if (x !== 1) { y(); }"));
        assert!(findings.is_empty());
    }

    #[test]
    fn test_javascript_loose_inequality_rewrite() {
        let findings = analyze(&submission("js", "if (a != b) {}"));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].suggestion.as_deref(), Some("if (a !== b) {}"));
    }

    #[test]
    fn test_python_triggers() {
        let code = "def fetch(urls=[]):\n    print(\"start\")\n    name = 'a' + 'b'\n";
        let findings = analyze(&submission("Python", code));

        assert!(findings
            .iter()
            .any(|f| f.line == 1 && f.comment_type == CommentType::Warning));
        assert!(findings
            .iter()
            .any(|f| f.line == 2 && f.text.contains("logging")));
        assert!(findings
            .iter()
            .any(|f| f.line == 3 && f.text.contains("f-string")));
    }

    #[test]
    fn test_java_triggers() {
        let code = "System.out.println(\"hi\");\nif (user == null) { return; }";
        let findings = analyze(&submission("Java", code));

        assert_eq!(findings.len(), 2);
        assert!(findings
            .iter()
            .all(|f| f.comment_type == CommentType::Suggestion));
    }

    #[test]
    fn test_cpp_triggers() {
        let code = "using namespace std;\nint* ptr = nullptr;";
        let findings = analyze(&submission("C++", code));

        assert!(findings
            .iter()
            .any(|f| f.line == 1 && f.comment_type == CommentType::Warning));
        assert!(findings
            .iter()
            .any(|f| f.line == 2 && f.text.contains("Raw pointer")));
    }

    #[test]
    fn test_generic_ruleset_for_unknown_language() {
        let long_line = "x".repeat(120);
        let code = format!("{}\nshort line   \nclean", long_line);
        let findings = analyze(&submission("COBOL", &code));

        assert!(findings
            .iter()
            .any(|f| f.line == 1 && f.text.contains("100 characters")));

        let trailing = findings
            .iter()
            .find(|f| f.line == 2)
            .expect("trailing whitespace finding");
        assert_eq!(trailing.comment_type, CommentType::Info);
        assert_eq!(trailing.suggestion.as_deref(), Some("short line"));

        assert!(!findings.iter().any(|f| f.line == 3));
    }

    #[test]
    fn test_language_normalization() {
        assert_eq!(Ruleset::for_language("  JavaScript "), Ruleset::JavaScript);
        assert_eq!(Ruleset::for_language("TS"), Ruleset::JavaScript);
        assert_eq!(Ruleset::for_language("PYTHON"), Ruleset::Python);
        assert_eq!(Ruleset::for_language("C++"), Ruleset::Cpp);
        assert_eq!(Ruleset::for_language("Haskell"), Ruleset::Generic);
    }
}
