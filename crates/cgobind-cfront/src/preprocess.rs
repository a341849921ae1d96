//! A small C preprocessor.
//!
//! Supports what API headers typically rely on: include guards and
//! `#pragma once`, `#include` with search directories, object-like and
//! function-like macros (including `#` and `##`), and conditional groups.
//! Macro expansion does not rescan into the tokens following an expansion,
//! which headers that only wrap declarations never need.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::{CParseError, Location, Result};
use crate::expr::{self, EmptyScope};
use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};

/// Nested `#include` depth at which the preprocessor assumes a cycle.
const MAX_INCLUDE_DEPTH: usize = 200;

/// Macros defined before any header is read.
const PREDEFINED: &[(&str, &str)] = &[
    ("__STDC__", "1"),
    ("__STDC_VERSION__", "199901L"),
    ("__STDC_HOSTED__", "1"),
    ("__LP64__", "1"),
    ("__x86_64__", "1"),
    ("__linux__", "1"),
];

/// Options controlling header lookup and predefined macros.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Directories searched for `#include`, in order.
    pub include_dirs: Vec<PathBuf>,
    /// Extra macro definitions (`-DNAME` or `-DNAME=VALUE`).
    pub defines: Vec<(String, Option<String>)>,
}

#[derive(Debug, Clone)]
enum Macro {
    Object(Vec<Token>),
    Function {
        params: Vec<String>,
        variadic: bool,
        body: Vec<Token>,
    },
}

/// State of one `#if` group.
#[derive(Debug)]
struct Conditional {
    /// The enclosing group is active.
    parent_active: bool,
    /// Some branch of this group was already taken.
    taken: bool,
    /// The current branch is active.
    active: bool,
    seen_else: bool,
}

/// Preprocesses one or more files into a single token stream.
pub struct Preprocessor<'a> {
    options: &'a ParseOptions,
    macros: HashMap<String, Macro>,
    once: HashSet<PathBuf>,
    depth: usize,
    output: Vec<Token>,
}

impl<'a> Preprocessor<'a> {
    pub fn new(options: &'a ParseOptions) -> Result<Self> {
        let mut pp = Self {
            options,
            macros: HashMap::new(),
            once: HashSet::new(),
            depth: 0,
            output: Vec::new(),
        };
        let builtin: Arc<Path> = Arc::from(Path::new("<built-in>"));
        for (name, value) in PREDEFINED {
            pp.define_str(name, value, &builtin)?;
        }
        let command_line: Arc<Path> = Arc::from(Path::new("<command line>"));
        for (name, value) in &options.defines {
            pp.define_str(name, value.as_deref().unwrap_or("1"), &command_line)?;
        }
        Ok(pp)
    }

    fn define_str(&mut self, name: &str, value: &str, file: &Arc<Path>) -> Result<()> {
        let body = tokenize(value, file.clone())?;
        self.macros.insert(name.to_string(), Macro::Object(body));
        Ok(())
    }

    /// Preprocess the file at `path`, appending its tokens to the output.
    pub fn run_file(&mut self, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path).map_err(|source| CParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        // Vendor headers may carry Latin-1 bytes in comments.
        let source = String::from_utf8_lossy(&bytes);
        self.run_source(path, &source)
    }

    /// Preprocess in-memory `source` as if it were read from `path`.
    pub fn run_source(&mut self, path: &Path, source: &str) -> Result<()> {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if self.once.contains(&key) {
            trace!(path = %path.display(), "skipping #pragma once header");
            return Ok(());
        }
        let file: Arc<Path> = Arc::from(path);
        let tokens = tokenize(source, file.clone())?;
        debug!(path = %path.display(), tokens = tokens.len(), "preprocessing");
        self.process(&tokens, path, &key, &file)
    }

    /// The preprocessed token stream.
    pub fn finish(self) -> Vec<Token> {
        self.output
    }

    fn process(&mut self, tokens: &[Token], path: &Path, key: &Path, file: &Arc<Path>) -> Result<()> {
        let mut stack: Vec<Conditional> = Vec::new();
        let mut pending: Vec<Token> = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let end = line_end(tokens, i);
            let line = &tokens[i..end];
            let active = stack.last().map_or(true, |c| c.active);

            if line[0].is_punct("#") {
                if active {
                    self.flush(&mut pending)?;
                }
                self.directive(line, active, &mut stack, path, key)?;
            } else if active {
                pending.extend_from_slice(line);
            }
            i = end;
        }

        if !stack.is_empty() {
            return Err(CParseError::Preprocessor {
                location: tokens
                    .last()
                    .map_or_else(|| Location::start_of(file.clone()), |t| t.location.clone()),
                detail: "unterminated conditional directive".to_string(),
            });
        }
        self.flush(&mut pending)
    }

    fn flush(&mut self, pending: &mut Vec<Token>) -> Result<()> {
        if pending.is_empty() {
            return Ok(());
        }
        let expanded = self.expand(pending, &mut Vec::new())?;
        self.output.extend(expanded);
        pending.clear();
        Ok(())
    }

    fn directive(
        &mut self,
        line: &[Token],
        active: bool,
        stack: &mut Vec<Conditional>,
        path: &Path,
        key: &Path,
    ) -> Result<()> {
        let hash = &line[0];
        let Some(name_tok) = line.get(1) else {
            return Ok(());
        };
        let rest = &line[2..];

        match name_tok.text.as_str() {
            "if" | "ifdef" | "ifndef" => {
                let cond = if active {
                    match name_tok.text.as_str() {
                        "ifdef" => self.is_defined(rest, name_tok)?,
                        "ifndef" => !self.is_defined(rest, name_tok)?,
                        _ => self.condition(rest, name_tok)?,
                    }
                } else {
                    false
                };
                stack.push(Conditional {
                    parent_active: active,
                    taken: cond,
                    active: active && cond,
                    seen_else: false,
                });
            }
            "elif" => {
                let group = Self::current_group(stack, name_tok)?;
                if group.seen_else {
                    return Err(directive_error(name_tok, "#elif after #else"));
                }
                let parent_active = group.parent_active;
                let taken = group.taken;
                let cond = parent_active && !taken && self.condition(rest, name_tok)?;
                let group = Self::current_group(stack, name_tok)?;
                group.active = cond;
                group.taken |= cond;
            }
            "else" => {
                let group = Self::current_group(stack, name_tok)?;
                if group.seen_else {
                    return Err(directive_error(name_tok, "#else after #else"));
                }
                group.seen_else = true;
                group.active = group.parent_active && !group.taken;
                group.taken = true;
            }
            "endif" => {
                if stack.pop().is_none() {
                    return Err(directive_error(name_tok, "#endif without #if"));
                }
            }
            _ if !active => {}
            "define" => self.define(rest, name_tok)?,
            "undef" => {
                if let Some(name) = rest.first().and_then(Token::ident) {
                    self.macros.remove(name);
                }
            }
            "include" | "include_next" => self.include(rest, name_tok, path)?,
            "pragma" => {
                if rest.first().is_some_and(|t| t.is_ident("once")) {
                    self.once.insert(key.to_path_buf());
                }
            }
            "error" => {
                return Err(CParseError::ErrorDirective {
                    location: hash.location.clone(),
                    message: join_tokens(rest),
                })
            }
            other => trace!(directive = other, "ignoring directive"),
        }
        Ok(())
    }

    fn current_group<'s>(stack: &'s mut [Conditional], at: &Token) -> Result<&'s mut Conditional> {
        stack
            .last_mut()
            .ok_or_else(|| directive_error(at, &format!("#{} without #if", at.text)))
    }

    fn is_defined(&self, rest: &[Token], at: &Token) -> Result<bool> {
        let name = rest
            .first()
            .and_then(Token::ident)
            .ok_or_else(|| directive_error(at, "expected macro name"))?;
        Ok(self.macros.contains_key(name))
    }

    /// Evaluate an `#if`/`#elif` condition.
    fn condition(&self, rest: &[Token], at: &Token) -> Result<bool> {
        let mut resolved = Vec::with_capacity(rest.len());
        let mut i = 0;
        while i < rest.len() {
            let tok = &rest[i];
            if tok.is_ident("defined") {
                let (name, next) = match rest.get(i + 1) {
                    Some(open) if open.is_punct("(") => {
                        let close_ok = rest.get(i + 3).is_some_and(|t| t.is_punct(")"));
                        match rest.get(i + 2).and_then(Token::ident) {
                            Some(name) if close_ok => (name, i + 4),
                            _ => return Err(directive_error(at, "malformed defined()")),
                        }
                    }
                    Some(t) if t.kind == TokenKind::Identifier => (t.text.as_str(), i + 2),
                    _ => return Err(directive_error(at, "malformed defined")),
                };
                let value = if self.macros.contains_key(name) { "1" } else { "0" };
                resolved.push(Token::new(TokenKind::Number, value, tok.location.clone()));
                i = next;
            } else if tok.ident().is_some_and(|name| name.starts_with("__has_")) {
                // Feature checks such as `__has_include` are answered conservatively.
                let next = match rest.get(i + 1) {
                    Some(open) if open.is_punct("(") => matching_paren(rest, i + 1).map_or(rest.len(), |c| c + 1),
                    _ => i + 1,
                };
                resolved.push(Token::new(TokenKind::Number, "0", tok.location.clone()));
                i = next;
            } else {
                resolved.push(tok.clone());
                i += 1;
            }
        }

        let expanded = self.expand(&resolved, &mut Vec::new())?;
        let zeroed: Vec<Token> = expanded
            .into_iter()
            .map(|t| {
                if t.kind == TokenKind::Identifier {
                    Token::new(TokenKind::Number, "0", t.location)
                } else {
                    t
                }
            })
            .collect();
        Ok(expr::evaluate(&zeroed, &EmptyScope, &at.location)? != 0)
    }

    fn define(&mut self, rest: &[Token], at: &Token) -> Result<()> {
        let name_tok = rest
            .first()
            .filter(|t| t.kind == TokenKind::Identifier)
            .ok_or_else(|| directive_error(at, "macro name must be an identifier"))?;
        let name = name_tok.text.clone();

        let function_like = rest.get(1).is_some_and(|t| t.is_punct("(") && !t.leading_space);
        let mac = if function_like {
            let mut params = Vec::new();
            let mut variadic = false;
            let mut j = 2;
            loop {
                let tok = rest
                    .get(j)
                    .ok_or_else(|| directive_error(name_tok, "unterminated macro parameter list"))?;
                j += 1;
                match tok.text.as_str() {
                    ")" => break,
                    "," => {}
                    "..." => variadic = true,
                    _ if tok.kind == TokenKind::Identifier => params.push(tok.text.clone()),
                    other => {
                        return Err(directive_error(
                            name_tok,
                            &format!("unexpected '{other}' in macro parameter list"),
                        ))
                    }
                }
            }
            Macro::Function {
                params,
                variadic,
                body: rest[j..].to_vec(),
            }
        } else {
            Macro::Object(rest[1..].to_vec())
        };
        trace!(name = %name, "define");
        self.macros.insert(name, mac);
        Ok(())
    }

    fn include(&mut self, rest: &[Token], at: &Token, path: &Path) -> Result<()> {
        let (name, quoted) = match header_name(rest) {
            Some(found) => found,
            None => {
                let expanded = self.expand(rest, &mut Vec::new())?;
                header_name(&expanded).ok_or_else(|| directive_error(at, "expected header name"))?
            }
        };

        let mut candidates = Vec::new();
        if quoted {
            if let Some(dir) = path.parent() {
                candidates.push(dir.join(&name));
            }
        }
        candidates.extend(self.options.include_dirs.iter().map(|dir| dir.join(&name)));

        let Some(found) = candidates.into_iter().find(|c| c.is_file()) else {
            if quoted {
                return Err(CParseError::IncludeNotFound {
                    location: at.location.clone(),
                    name,
                });
            }
            debug!(header = %name, "system header not found, skipping");
            return Ok(());
        };

        if self.depth >= MAX_INCLUDE_DEPTH {
            return Err(directive_error(at, "#include nested too deeply"));
        }
        self.depth += 1;
        let result = self.run_file(&found);
        self.depth -= 1;
        result
    }

    /// Macro-expand `tokens`. `disabled` holds the macros currently being
    /// expanded, which must not expand again.
    fn expand(&self, tokens: &[Token], disabled: &mut Vec<String>) -> Result<Vec<Token>> {
        let mut out = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            let tok = &tokens[i];
            let mac = tok
                .ident()
                .filter(|name| !disabled.iter().any(|d| d == name))
                .and_then(|name| self.macros.get(name));

            match mac {
                Some(Macro::Object(body)) => {
                    let body = relocate(body, tok);
                    disabled.push(tok.text.clone());
                    let expanded = self.expand(&body, disabled);
                    disabled.pop();
                    out.extend(expanded?);
                    i += 1;
                }
                Some(Macro::Function {
                    params,
                    variadic,
                    body,
                }) if tokens.get(i + 1).is_some_and(|t| t.is_punct("(")) => {
                    let (args, next) = collect_args(tokens, i + 1)?;
                    let substituted = self.substitute(tok, params, *variadic, body, args, disabled)?;
                    disabled.push(tok.text.clone());
                    let expanded = self.expand(&substituted, disabled);
                    disabled.pop();
                    out.extend(expanded?);
                    i = next;
                }
                _ => {
                    out.push(tok.clone());
                    i += 1;
                }
            }
        }
        Ok(out)
    }

    fn substitute(
        &self,
        invocation: &Token,
        params: &[String],
        variadic: bool,
        body: &[Token],
        mut args: Vec<Vec<Token>>,
        disabled: &mut Vec<String>,
    ) -> Result<Vec<Token>> {
        if params.is_empty() && !variadic && args.len() == 1 && args[0].is_empty() {
            args.clear();
        }
        let va_args = if variadic {
            let rest = args.split_off(params.len().min(args.len()));
            let mut joined = Vec::new();
            for (n, arg) in rest.into_iter().enumerate() {
                if n > 0 {
                    joined.push(Token::new(TokenKind::Punct, ",", invocation.location.clone()));
                }
                joined.extend(arg);
            }
            Some(joined)
        } else {
            None
        };
        if args.len() != params.len() {
            return Err(directive_error(
                invocation,
                &format!(
                    "macro '{}' expects {} arguments, got {}",
                    invocation.text,
                    params.len(),
                    args.len()
                ),
            ));
        }

        let lookup = |name: &str| argument(name, params, &args, va_args.as_ref());

        let mut out = Vec::with_capacity(body.len());
        let mut j = 0;
        while j < body.len() {
            let tok = &body[j];
            if tok.is_punct("#") {
                if let Some(arg) = body.get(j + 1).and_then(Token::ident).and_then(lookup) {
                    let text = format!("\"{}\"", join_tokens(arg).replace('\\', "\\\\").replace('"', "\\\""));
                    out.push(Token::new(TokenKind::StringLiteral, text, invocation.location.clone()));
                    j += 2;
                    continue;
                }
            }
            match tok.ident().and_then(lookup) {
                Some(arg) => {
                    let pasted = body.get(j + 1).is_some_and(|t| t.is_punct("##"))
                        || (j > 0 && body[j - 1].is_punct("##"));
                    if pasted {
                        out.extend(arg.iter().cloned());
                    } else {
                        out.extend(self.expand(arg, disabled)?);
                    }
                }
                None => out.push(tok.relocated(&invocation.location, tok.leading_space)),
            }
            j += 1;
        }
        Ok(paste(out))
    }
}

/// Tokens bound to the macro parameter `name`, if it is one.
fn argument<'t>(
    name: &str,
    params: &[String],
    args: &'t [Vec<Token>],
    va_args: Option<&'t Vec<Token>>,
) -> Option<&'t Vec<Token>> {
    if name == "__VA_ARGS__" {
        return va_args;
    }
    params.iter().position(|p| p == name).map(|idx| &args[idx])
}

/// Index one past the last token of the logical line starting at `start`.
fn line_end(tokens: &[Token], start: usize) -> usize {
    tokens[start + 1..]
        .iter()
        .position(|t| t.line_start)
        .map_or(tokens.len(), |offset| start + 1 + offset)
}

/// Index of the `)` matching the `(` at `open`.
fn matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, tok) in tokens.iter().enumerate().skip(open) {
        if tok.is_punct("(") {
            depth += 1;
        } else if tok.is_punct(")") {
            depth -= 1;
            if depth == 0 {
                return Some(idx);
            }
        }
    }
    None
}

/// Split the arguments of a macro invocation whose `(` is at `open`.
/// Returns the arguments and the index following the closing `)`.
fn collect_args(tokens: &[Token], open: usize) -> Result<(Vec<Vec<Token>>, usize)> {
    let close = matching_paren(tokens, open).ok_or_else(|| {
        directive_error(&tokens[open], "unterminated macro invocation")
    })?;
    let mut args = vec![Vec::new()];
    let mut depth = 0usize;
    for tok in &tokens[open + 1..close] {
        if tok.is_punct("(") {
            depth += 1;
        } else if tok.is_punct(")") {
            depth -= 1;
        } else if tok.is_punct(",") && depth == 0 {
            args.push(Vec::new());
            continue;
        }
        if let Some(last) = args.last_mut() {
            last.push(tok.clone());
        }
    }
    Ok((args, close + 1))
}

/// Apply `##` operators left in a substituted macro body.
fn paste(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();
    while let Some(tok) = iter.next() {
        if !tok.is_punct("##") {
            out.push(tok);
            continue;
        }
        let Some(right) = iter.next() else {
            break;
        };
        match out.pop() {
            Some(left) => {
                let text = format!("{}{}", left.text, right.text);
                let kind = classify_pasted(&text);
                let mut joined = Token::new(kind, text, left.location);
                joined.leading_space = left.leading_space;
                out.push(joined);
            }
            None => out.push(right),
        }
    }
    out
}

fn classify_pasted(text: &str) -> TokenKind {
    match text.chars().next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => TokenKind::Identifier,
        Some(c) if c.is_ascii_digit() => TokenKind::Number,
        _ => TokenKind::Punct,
    }
}

/// Macro body tokens relocated to the invocation site.
fn relocate(body: &[Token], invocation: &Token) -> Vec<Token> {
    body.iter()
        .enumerate()
        .map(|(n, t)| {
            let leading = if n == 0 { invocation.leading_space } else { t.leading_space };
            t.relocated(&invocation.location, leading)
        })
        .collect()
}

/// `"name"` or `<name>` at the start of an include line.
fn header_name(tokens: &[Token]) -> Option<(String, bool)> {
    let first = tokens.first()?;
    if first.kind == TokenKind::StringLiteral {
        let name = first.text.trim_matches('"').to_string();
        return Some((name, true));
    }
    if first.is_punct("<") {
        let close = tokens.iter().position(|t| t.is_punct(">"))?;
        let name: String = tokens[1..close].iter().map(|t| t.text.as_str()).collect();
        return Some((name, false));
    }
    None
}

fn join_tokens(tokens: &[Token]) -> String {
    let mut text = String::new();
    for (n, tok) in tokens.iter().enumerate() {
        if n > 0 && tok.leading_space {
            text.push(' ');
        }
        text.push_str(&tok.text);
    }
    text
}

fn directive_error(at: &Token, detail: &str) -> CParseError {
    CParseError::Preprocessor {
        location: at.location.clone(),
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preprocess(src: &str) -> Vec<String> {
        preprocess_with(src, &ParseOptions::default()).unwrap()
    }

    fn preprocess_with(src: &str, options: &ParseOptions) -> Result<Vec<String>> {
        let mut pp = Preprocessor::new(options)?;
        pp.run_source(Path::new("test.h"), src)?;
        Ok(pp.finish().into_iter().map(|t| t.text).collect())
    }

    #[test]
    fn object_macro_expands() {
        let out = preprocess("#define VG_API_CALL extern\nVG_API_CALL void f(void);");
        assert_eq!(out, vec!["extern", "void", "f", "(", "void", ")", ";"]);
    }

    #[test]
    fn empty_macro_vanishes() {
        let out = preprocess("#define VG_API_ENTRY\nvoid VG_API_ENTRY f(void);");
        assert_eq!(out, vec!["void", "f", "(", "void", ")", ";"]);
    }

    #[test]
    fn function_macro_with_arguments() {
        let out = preprocess("#define ADD(a, b) ((a) + (b))\nint x[ADD(1, 2)];");
        assert_eq!(out.join(" "), "int x [ ( ( 1 ) + ( 2 ) ) ] ;");
    }

    #[test]
    fn token_pasting_and_stringizing() {
        let out = preprocess("#define NAME(x) vg ## x\n#define STR(x) #x\nNAME(Flush) STR(a b)");
        assert_eq!(out, vec!["vgFlush", "\"a b\""]);
    }

    #[test]
    fn recursive_macro_does_not_loop() {
        let out = preprocess("#define foo foo\nfoo");
        assert_eq!(out, vec!["foo"]);
    }

    #[test]
    fn conditionals_select_branches() {
        let src = "#define A 1\n#if A && !defined(B)\nyes\n#elif 1\nno\n#else\nnever\n#endif\n#ifdef B\nhidden\n#endif";
        assert_eq!(preprocess(src), vec!["yes"]);
    }

    #[test]
    fn nested_inactive_groups_stay_inactive() {
        let src = "#if 0\n#if 1\na\n#else\nb\n#endif\n#else\nc\n#endif";
        assert_eq!(preprocess(src), vec!["c"]);
    }

    #[test]
    fn include_guard_and_pragma_once() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("inner.h"), "#pragma once\ntypedef int VGint;\n").unwrap();
        let main = dir.path().join("main.h");
        std::fs::write(&main, "#include \"inner.h\"\n#include \"inner.h\"\nVGint x;\n").unwrap();

        let options = ParseOptions::default();
        let mut pp = Preprocessor::new(&options).unwrap();
        pp.run_file(&main).unwrap();
        let texts: Vec<String> = pp.finish().into_iter().map(|t| t.text).collect();
        assert_eq!(texts.iter().filter(|t| *t == "typedef").count(), 1);
    }

    #[test]
    fn latin1_comment_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let header = dir.path().join("vg.h");
        std::fs::write(&header, b"/* Copyright \xA9 2008 Mazatech */\nvoid vgFlush(void);\n").unwrap();

        let options = ParseOptions::default();
        let mut pp = Preprocessor::new(&options).unwrap();
        pp.run_file(&header).unwrap();
        let texts: Vec<String> = pp.finish().into_iter().map(|t| t.text).collect();
        assert_eq!(texts, ["void", "vgFlush", "(", "void", ")", ";"]);
    }

    #[test]
    fn include_dirs_are_searched() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("KHR")).unwrap();
        std::fs::write(dir.path().join("KHR/plat.h"), "#define PLAT 1\n").unwrap();
        let options = ParseOptions {
            include_dirs: vec![dir.path().to_path_buf()],
            ..Default::default()
        };
        let out = preprocess_with("#include <KHR/plat.h>\nPLAT", &options).unwrap();
        assert_eq!(out, vec!["1"]);
    }

    #[test]
    fn missing_system_header_is_skipped() {
        assert_eq!(preprocess("#include <nowhere/missing.h>\nx"), vec!["x"]);
    }

    #[test]
    fn missing_quoted_header_is_fatal() {
        let err = preprocess_with("#include \"missing.h\"", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, CParseError::IncludeNotFound { .. }));
    }

    #[test]
    fn error_directive_is_fatal_only_when_active() {
        assert!(preprocess_with("#error boom", &ParseOptions::default()).is_err());
        assert!(preprocess("#if 0\n#error boom\n#endif").is_empty());
    }

    #[test]
    fn unterminated_conditional_is_error() {
        assert!(preprocess_with("#if 1\nx", &ParseOptions::default()).is_err());
    }

    #[test]
    fn command_line_defines() {
        let options = ParseOptions {
            defines: vec![("VG_VERSION".into(), Some("11".into())), ("FLAG".into(), None)],
            ..Default::default()
        };
        let out = preprocess_with("VG_VERSION FLAG", &options).unwrap();
        assert_eq!(out, vec!["11", "1"]);
    }
}
