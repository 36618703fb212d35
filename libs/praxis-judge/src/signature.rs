//! Entry-point resolution.
//!
//! Locates the one function the user meant to submit. Resolution is an
//! ordered chain of pure predicate/extractor steps over (a) a
//! tokenizer-level static scan of the source and (b) the facts reported
//! by a single runtime probe of the loaded code (see
//! `runner::javascript::probe`). Each step's precondition is explicit so
//! the chain is testable without an interpreter on the host.
//!
//! Python has no host-side probe: when the static `def` scan finds
//! nothing, resolution defers to the fallback chain inside the runtime
//! companion script, which alone can introspect live objects.

use lazy_static::lazy_static;
use praxis_common::error::{JudgeError, JudgeResult};
use praxis_common::types::Language;
use regex::Regex;
use serde::Deserialize;

/// Conventional entry-point names probed as a last resort, in order.
pub const CONVENTIONAL_NAMES: [&str; 3] = ["solve", "solution", "main"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallableKind {
    /// A top-level function, called directly.
    Function,
    /// An instance method: construct `class`, call the method on it.
    Method { class: String },
    /// The module export itself (or its `default` property).
    Export { default: bool },
    /// Entry selection happens inside the runtime companion script.
    Deferred,
}

/// The judge's binding to the submission's entry point.
///
/// `arg_names` holds statically visible parameter names (may be empty);
/// `fallback_arity` is used to slice positional arguments when no name
/// correspondence exists.
#[derive(Debug, Clone)]
pub struct ResolvedCallable {
    pub name: Option<String>,
    pub arg_names: Vec<String>,
    pub fallback_arity: usize,
    pub kind: CallableKind,
}

/// A callable observed by the runtime probe.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedArity {
    pub name: String,
    pub arity: usize,
}

/// Facts gathered by loading the submission once in a fresh isolated
/// context. `new_callables` preserves first-observed order: ambiguous
/// submissions must resolve identically on every run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeFacts {
    #[serde(default)]
    pub expected_arity: Option<usize>,
    #[serde(default)]
    pub new_callables: Vec<NamedArity>,
    #[serde(default)]
    pub conventional: Vec<NamedArity>,
    #[serde(default)]
    pub export_arity: Option<usize>,
    #[serde(default)]
    pub export_default_arity: Option<usize>,
}

lazy_static! {
    static ref JS_FN_DECL: Regex =
        Regex::new(r"function\s+([A-Za-z_$][\w$]*)\s*\(([^)]*)\)").unwrap();
    static ref JS_ASSIGN_ARROW: Regex =
        Regex::new(r"(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*(?:async\s+)?\(([^)]*)\)\s*=>")
            .unwrap();
    static ref JS_ASSIGN_FN: Regex = Regex::new(
        r"(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*function(?:\s+[A-Za-z_$][\w$]*)?\s*\(([^)]*)\)"
    )
    .unwrap();
    static ref JS_ASSIGN_ARROW_BARE: Regex =
        Regex::new(r"(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*(?:async\s+)?([A-Za-z_$][\w$]*)\s*=>")
            .unwrap();
    static ref JS_CLASS_DECL: Regex = Regex::new(r"class\s+([A-Za-z_$][\w$]*)").unwrap();
    static ref JS_METHOD_DECL: Regex =
        Regex::new(r"(?m)^\s*(?:async\s+)?([A-Za-z_$][\w$]*)\s*\(([^)]*)\)\s*\{").unwrap();
    static ref PY_DEF: Regex =
        Regex::new(r"(?m)^def\s+([A-Za-z_]\w*)\s*\(([^)]*)\)\s*(?:->[^:]+)?:").unwrap();
}

/// Resolve the entry point of a submission.
///
/// `facts` must be present for JavaScript (the probe already ran) and is
/// ignored for Python.
pub fn resolve(
    language: Language,
    code: &str,
    expected_name: Option<&str>,
    facts: Option<&ProbeFacts>,
) -> JudgeResult<ResolvedCallable> {
    match language {
        Language::Javascript => {
            let facts = facts.cloned().unwrap_or_default();
            resolve_javascript(code, expected_name, &facts)
        }
        Language::Python => Ok(resolve_python(code, expected_name)),
    }
}

/// JavaScript chain, first match wins:
/// 1. expected name callable in the loaded context (arity from probe,
///    argument names deliberately left empty);
/// 2. structural declaration: `function f(a,b)`, `const f = (a,b) =>`,
///    `const f = function (a,b)`, `const f = a =>`;
/// 3. class with an instance method (first non-underscore method);
/// 4. first newly-observed callable from the probe's binding diff;
/// 5. conventional names `solve`, `solution`, `main`;
/// 6. callable module export, or its callable `default` property.
pub fn resolve_javascript(
    code: &str,
    expected_name: Option<&str>,
    facts: &ProbeFacts,
) -> JudgeResult<ResolvedCallable> {
    if let (Some(name), Some(arity)) = (expected_name, facts.expected_arity) {
        return Ok(ResolvedCallable {
            name: Some(name.to_string()),
            arg_names: Vec::new(),
            fallback_arity: arity,
            kind: CallableKind::Function,
        });
    }

    if let Some(found) = scan_js_declaration(code) {
        return Ok(found);
    }

    if let Some(found) = scan_js_class(code) {
        return Ok(found);
    }

    if let Some(first) = facts.new_callables.first() {
        return Ok(ResolvedCallable {
            name: Some(first.name.clone()),
            arg_names: Vec::new(),
            fallback_arity: first.arity,
            kind: CallableKind::Function,
        });
    }

    for candidate in CONVENTIONAL_NAMES {
        if let Some(found) = facts.conventional.iter().find(|c| c.name == candidate) {
            return Ok(ResolvedCallable {
                name: Some(found.name.clone()),
                arg_names: Vec::new(),
                fallback_arity: found.arity,
                kind: CallableKind::Function,
            });
        }
    }

    if let Some(arity) = facts.export_arity {
        return Ok(ResolvedCallable {
            name: None,
            arg_names: Vec::new(),
            fallback_arity: arity,
            kind: CallableKind::Export { default: false },
        });
    }
    if let Some(arity) = facts.export_default_arity {
        return Ok(ResolvedCallable {
            name: None,
            arg_names: Vec::new(),
            fallback_arity: arity,
            kind: CallableKind::Export { default: true },
        });
    }

    Err(JudgeError::ResolutionFailure(
        "no callable entry point found in submission".to_string(),
    ))
}

fn scan_js_declaration(code: &str) -> Option<ResolvedCallable> {
    for pattern in [&*JS_FN_DECL, &*JS_ASSIGN_ARROW, &*JS_ASSIGN_FN] {
        if let Some(caps) = pattern.captures(code) {
            let name = caps.get(1).unwrap().as_str().to_string();
            let (arg_names, arity) = split_params(caps.get(2).unwrap().as_str());
            return Some(ResolvedCallable {
                name: Some(name),
                arg_names,
                fallback_arity: arity,
                kind: CallableKind::Function,
            });
        }
    }
    if let Some(caps) = JS_ASSIGN_ARROW_BARE.captures(code) {
        let name = caps.get(1).unwrap().as_str().to_string();
        let param = caps.get(2).unwrap().as_str().to_string();
        return Some(ResolvedCallable {
            name: Some(name),
            arg_names: vec![param],
            fallback_arity: 1,
            kind: CallableKind::Function,
        });
    }
    None
}

fn scan_js_class(code: &str) -> Option<ResolvedCallable> {
    let caps = JS_CLASS_DECL.captures(code)?;
    let class = caps.get(1).unwrap().as_str().to_string();
    let body_start = code[caps.get(0).unwrap().end()..].find('{')? + caps.get(0).unwrap().end();
    let body = brace_block(&code[body_start..])?;

    const KEYWORDS: [&str; 7] = ["if", "for", "while", "switch", "catch", "return", "function"];
    for method in JS_METHOD_DECL.captures_iter(body) {
        let name = method.get(1).unwrap().as_str();
        if name == "constructor" || name.starts_with('_') || KEYWORDS.contains(&name) {
            continue;
        }
        let (arg_names, arity) = split_params(method.get(2).unwrap().as_str());
        return Some(ResolvedCallable {
            name: Some(name.to_string()),
            arg_names,
            fallback_arity: arity,
            kind: CallableKind::Method { class },
        });
    }
    None
}

/// Python: static scan for a top-level `def`. The expected name wins if
/// declared; otherwise the first declaration. With no match, selection
/// defers to the runtime companion script's fallback chain.
pub fn resolve_python(code: &str, expected_name: Option<&str>) -> ResolvedCallable {
    let defs: Vec<(String, Vec<String>, usize)> = PY_DEF
        .captures_iter(code)
        .map(|caps| {
            let name = caps.get(1).unwrap().as_str().to_string();
            let (args, arity) = split_python_params(caps.get(2).unwrap().as_str());
            (name, args, arity)
        })
        .collect();

    let chosen = expected_name
        .and_then(|want| defs.iter().find(|(name, _, _)| name == want))
        .or_else(|| defs.first());

    match chosen {
        Some((name, args, arity)) => ResolvedCallable {
            name: Some(name.clone()),
            arg_names: args.clone(),
            fallback_arity: *arity,
            kind: CallableKind::Function,
        },
        None => ResolvedCallable {
            name: expected_name.map(str::to_string),
            arg_names: Vec::new(),
            fallback_arity: 0,
            kind: CallableKind::Deferred,
        },
    }
}

/// Extract the function name a problem's starter code advertises.
pub fn expected_name_from_starter(starter: &str, language: Language) -> Option<String> {
    match language {
        Language::Javascript => scan_js_declaration(starter)
            .and_then(|c| c.name)
            .or_else(|| scan_js_class(starter).and_then(|c| c.name)),
        Language::Python => PY_DEF
            .captures(starter)
            .map(|caps| caps.get(1).unwrap().as_str().to_string()),
    }
}

/// Split a JS parameter list; names are kept only when every parameter
/// is a plain identifier (defaults stripped). Destructuring or rest
/// parameters keep the arity but drop the names.
fn split_params(params: &str) -> (Vec<String>, usize) {
    let trimmed = params.trim();
    if trimmed.is_empty() {
        return (Vec::new(), 0);
    }
    let parts: Vec<&str> = split_top_level(trimmed);
    let arity = parts.len();
    let mut names = Vec::with_capacity(arity);
    for part in &parts {
        let name = part.split('=').next().unwrap_or("").trim();
        if !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
            && !name.chars().next().unwrap().is_ascii_digit()
        {
            names.push(name.to_string());
        } else {
            return (Vec::new(), arity);
        }
    }
    (names, arity)
}

/// Split on commas at bracket depth zero.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, b) in s.bytes().enumerate() {
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(s[start..].trim());
    parts
}

fn split_python_params(params: &str) -> (Vec<String>, usize) {
    let names: Vec<String> = split_top_level(params)
        .into_iter()
        .filter(|p| !p.is_empty() && *p != "self" && !p.starts_with('*'))
        .map(|p| {
            p.split(&[':', '='][..])
                .next()
                .unwrap_or("")
                .trim()
                .to_string()
        })
        .filter(|p| !p.is_empty())
        .collect();
    let arity = names.len();
    (names, arity)
}

/// Return the `{...}` block (exclusive of braces) starting at `text[0]`,
/// honoring nesting. Tokenizer-level only: braces inside string literals
/// are not tracked, which matches the approximate structural scan this
/// resolver is documented to be.
fn brace_block(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'{') {
        return None;
    }
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[1..i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, arity: usize) -> NamedArity {
        NamedArity {
            name: name.to_string(),
            arity,
        }
    }

    #[test]
    fn test_expected_name_wins_with_empty_arg_names() {
        let facts = ProbeFacts {
            expected_arity: Some(2),
            ..Default::default()
        };
        let code = "function twoSum(nums, target) { return []; }";
        let resolved = resolve_javascript(code, Some("twoSum"), &facts).unwrap();
        assert_eq!(resolved.name.as_deref(), Some("twoSum"));
        assert!(resolved.arg_names.is_empty());
        assert_eq!(resolved.fallback_arity, 2);
        assert_eq!(resolved.kind, CallableKind::Function);
    }

    #[test]
    fn test_function_declaration_scan() {
        let resolved =
            resolve_javascript("function twoSum(nums, target) {}", None, &ProbeFacts::default())
                .unwrap();
        assert_eq!(resolved.name.as_deref(), Some("twoSum"));
        assert_eq!(resolved.arg_names, vec!["nums", "target"]);
    }

    #[test]
    fn test_assigned_arrow_scan() {
        let resolved = resolve_javascript(
            "const add = (a, b) => a + b;",
            None,
            &ProbeFacts::default(),
        )
        .unwrap();
        assert_eq!(resolved.name.as_deref(), Some("add"));
        assert_eq!(resolved.arg_names, vec!["a", "b"]);
    }

    #[test]
    fn test_assigned_anonymous_function_scan() {
        let resolved = resolve_javascript(
            "var mul = function (x, y) { return x * y; };",
            None,
            &ProbeFacts::default(),
        )
        .unwrap();
        assert_eq!(resolved.name.as_deref(), Some("mul"));
        assert_eq!(resolved.arg_names, vec!["x", "y"]);
    }

    #[test]
    fn test_single_parameter_arrow_scan() {
        let resolved =
            resolve_javascript("let inc = n => n + 1;", None, &ProbeFacts::default()).unwrap();
        assert_eq!(resolved.name.as_deref(), Some("inc"));
        assert_eq!(resolved.arg_names, vec!["n"]);
        assert_eq!(resolved.fallback_arity, 1);
    }

    #[test]
    fn test_class_method_scan() {
        let code = r#"
class Solution {
    constructor() { this.seen = {}; }
    _reset() {}
    twoSum(nums, target) { return [0, 1]; }
}
"#;
        let resolved = resolve_javascript(code, None, &ProbeFacts::default()).unwrap();
        assert_eq!(resolved.name.as_deref(), Some("twoSum"));
        assert_eq!(
            resolved.kind,
            CallableKind::Method {
                class: "Solution".to_string()
            }
        );
        assert_eq!(resolved.arg_names, vec!["nums", "target"]);
    }

    #[test]
    fn test_probe_diff_first_newly_observed() {
        let facts = ProbeFacts {
            new_callables: vec![named("beta", 1), named("alpha", 2)],
            ..Default::default()
        };
        // No structural declaration - e.g. `this.x = ...`-style code the
        // scanner does not understand.
        let resolved = resolve_javascript("globalThis.beta = 1;", None, &facts).unwrap();
        assert_eq!(resolved.name.as_deref(), Some("beta"));
        assert_eq!(resolved.fallback_arity, 1);
    }

    #[test]
    fn test_conventional_name_order() {
        let facts = ProbeFacts {
            conventional: vec![named("main", 0), named("solution", 2)],
            ..Default::default()
        };
        let resolved = resolve_javascript("", None, &facts).unwrap();
        assert_eq!(resolved.name.as_deref(), Some("solution"));
    }

    #[test]
    fn test_export_fallbacks() {
        let facts = ProbeFacts {
            export_default_arity: Some(1),
            ..Default::default()
        };
        let resolved = resolve_javascript("", None, &facts).unwrap();
        assert_eq!(resolved.kind, CallableKind::Export { default: true });
    }

    #[test]
    fn test_no_callable_fails() {
        let err = resolve_javascript("const x = 42;", None, &ProbeFacts::default()).unwrap_err();
        assert!(err.to_string().contains("no callable entry point"));
    }

    #[test]
    fn test_python_static_def() {
        let resolved = resolve_python("def two_sum(nums, target):\n    return []\n", None);
        assert_eq!(resolved.name.as_deref(), Some("two_sum"));
        assert_eq!(resolved.arg_names, vec!["nums", "target"]);
        assert_eq!(resolved.kind, CallableKind::Function);
    }

    #[test]
    fn test_python_expected_name_preferred_over_first() {
        let code = "def helper(x):\n    return x\n\ndef two_sum(nums, target):\n    return []\n";
        let resolved = resolve_python(code, Some("two_sum"));
        assert_eq!(resolved.name.as_deref(), Some("two_sum"));
    }

    #[test]
    fn test_python_indented_def_is_not_top_level() {
        let code = "class Solution:\n    def twoSum(self, nums, target):\n        return []\n";
        let resolved = resolve_python(code, None);
        assert_eq!(resolved.kind, CallableKind::Deferred);
        assert!(resolved.arg_names.is_empty());
    }

    #[test]
    fn test_python_params_strip_annotations_and_self() {
        let resolved = resolve_python("def f(a: int, b=3, *rest):\n    pass\n", None);
        assert_eq!(resolved.arg_names, vec!["a", "b"]);
        assert_eq!(resolved.fallback_arity, 2);
    }

    #[test]
    fn test_starter_name_extraction() {
        assert_eq!(
            expected_name_from_starter(
                "var twoSum = function(nums, target) {\n};",
                Language::Javascript
            )
            .as_deref(),
            Some("twoSum")
        );
        assert_eq!(
            expected_name_from_starter("def two_sum(nums, target):\n    pass", Language::Python)
                .as_deref(),
            Some("two_sum")
        );
        assert_eq!(
            expected_name_from_starter("// just a comment", Language::Javascript),
            None
        );
    }

    #[test]
    fn test_destructured_params_drop_names_keep_arity() {
        let resolved = resolve_javascript(
            "function f({a, b}, c) {}",
            None,
            &ProbeFacts::default(),
        )
        .unwrap();
        assert!(resolved.arg_names.is_empty());
        assert_eq!(resolved.fallback_arity, 2);
    }
}
