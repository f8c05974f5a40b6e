
use once_cell::sync::Lazy;

/// One known path-valued compiler flag.
#[derive(Debug, Clone, Copy)]
pub struct PathFlagRule {
    pub flag: &'static str,
    /// Whether the flag also accepts its value as the following argument
    /// (`-I dir`) in addition to the fused `-Idir` / `-I=dir` forms.
    pub takes_separate_value: bool,
}

const fn rule(flag: &'static str, takes_separate_value: bool) -> PathFlagRule {
    PathFlagRule {
        flag,
        takes_separate_value,
    }
}

/// Flags whose value is a filesystem path, from the clang command-line
/// reference: https://clang.llvm.org/docs/ClangCommandLineReference.html
///
/// Intentionally permissive rather than exhaustive. An unknown flag is
/// never treated as a path; a known flag is detected even with an empty
/// value, and the normalizer's existence gate catches false positives.
pub const PATH_FLAG_RULES: &[PathFlagRule] = &[
    rule("-B", true),
    rule("-F", true),
    rule("-I", true),
    rule("/I", true),
    rule("--include-directory", true),
    rule("--amdgpu-arch-tool", false),
    rule("--cuda-path", false),
    rule("--cxx-isystem", true),
    rule("-fbuild-session-file", false),
    // Ignoring the -fmodule-file=<name>=<file> form.
    rule("-fmodule-file", false),
    rule("-fmodules-cache-path", false),
    rule("-fmodules-user-build-path", false),
    rule("-fprebuilt-module-path", false),
    rule("-fcrash-diagnostics-dir", false),
    rule("--hip-path", false),
    rule("-idirafter", true),
    rule("--include-directory-after", true),
    rule("-iframework", true),
    rule("-iframeworkwithsysroot", true),
    rule("-imacros", true),
    rule("--imacros", true),
    rule("-include", true),
    rule("--include", true),
    rule("-include-pch", true),
    rule("-iprefix", true),
    rule("--include-prefix", true),
    rule("-iquote", true),
    rule("-isysroot", true),
    rule("-isystem", true),
    rule("-isystem-after", true),
    rule("-ivfsoverlay", true),
    rule("-iwithprefix", true),
    rule("--include-with-prefix", true),
    rule("--include-with-prefix-after", true),
    rule("-iwithprefixbefore", true),
    rule("--include-with-prefix-before", true),
    rule("-iwithsysroot", true),
    rule("--libomptarget-amdgpu-bc-path", false),
    rule("--libomptarget-amdgcn-bc-path", false),
    rule("--libomptarget-nvptx-bc-path", false),
    rule("--nvptx-arch-tool", false),
    rule("--ptxas-path", false),
    rule("--rocm-path", false),
    rule("-stdlib++-isystem", true),
    rule("--system-header-prefix", true),
    rule("--no-system-header-prefix", true),
];

/// Rules ordered longest flag first, so the most specific rule wins
/// (`-include-pch` must match before `-include`). Built once, read-only
/// afterwards.
static RULES_BY_SPECIFICITY: Lazy<Vec<&'static PathFlagRule>> = Lazy::new(|| {
    let mut rules: Vec<&'static PathFlagRule> = PATH_FLAG_RULES.iter().collect();
    rules.sort_by(|a, b| b.flag.len().cmp(&a.flag.len()));
    rules
});

/// How one argument token relates to the path-flag table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagMatch {
    /// The token carries the flag and its value in one token, optionally
    /// separated by `=`. The value may be empty.
    FusedValue {
        flag: &'static str,
        value: String,
    },
    /// The token is a bare path flag whose value is the next token.
    SeparateValue,
    /// Not a recognized path flag.
    NotAPath,
}

/// Classify one argument token against the path-flag table.
///
/// Matching is case-sensitive and whole-flag-prefix based, tolerating a
/// single optional `=` between flag and value.
pub fn classify(token: &str) -> FlagMatch {
    for rule in RULES_BY_SPECIFICITY.iter() {
        let Some(rest) = token.strip_prefix(rule.flag) else {
            continue;
        };
        let value = rest.strip_prefix('=').unwrap_or(rest);
        if value.is_empty() && rule.takes_separate_value {
            return FlagMatch::SeparateValue;
        }
        return FlagMatch::FusedValue {
            flag: rule.flag,
            value: value.to_string(),
        };
    }
    FlagMatch::NotAPath
}
