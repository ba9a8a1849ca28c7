//! Symbol name normalisation.
//!
//! Debug-info files store function names in several shapes. This module
//! reduces all of them to the same thing: the list of scope components that
//! name the function, outermost first, with everything that does not identify
//! the function removed.
//!
//! ## Accepted shapes
//!
//! - **Rust**: legacy (`_ZN...17h<hash>E`) and v0 (`_R...`) through `rustc_demangle`
//! - **Itanium C++**: `_Z...` (and the Mach-O `__Z...` spelling)
//! - **MSVC decorated**: `?TestBody@Suite_Case_Test@@UAEXXZ`
//! - **Already demangled**: `ns::Suite_Case_Test<int>::TestBody(void)`
//!
//! ## What gets dropped
//!
//! Template arguments, parameter lists, cv/ref qualifiers, calling
//! conventions, ABI tags, return types and Rust hashes. Two symbols for the
//! same function compiled by different compiler versions therefore normalise
//! to the same path.
//!
//! Anything the parsers do not understand yields `None`. A missed symbol only
//! costs a source location; a misread one could attribute a test to the wrong
//! function, so the parsers give up rather than guess.

use rustc_demangle::try_demangle;
use smallvec::SmallVec;

/// Scope components of a function name, outermost first.
pub type ScopePath = SmallVec<[String; 4]>;

const ANONYMOUS_NAMESPACE: &str = "(anonymous namespace)";
const CONSTRUCTOR: &str = "{ctor}";
const DESTRUCTOR: &str = "{dtor}";

/// Normalise a raw symbol name into its scope components.
///
/// ## Example
///
/// ```rust
/// use testloc_core::symbols::demangle::scope_components;
///
/// let path = scope_components("_ZN15Suite_Case_Test8TestBodyEv").unwrap();
/// assert_eq!(path.as_slice(), ["Suite_Case_Test", "TestBody"]);
///
/// let path = scope_components("?TestBody@Suite_Case_Test@@UAEXXZ").unwrap();
/// assert_eq!(path.as_slice(), ["Suite_Case_Test", "TestBody"]);
/// ```
pub fn scope_components(name: &str) -> Option<ScopePath>
{
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    // `{:#}` leaves out the trailing `h<hash>` of legacy Rust symbols.
    if let Ok(demangled) = try_demangle(name) {
        return split_qualified(&format!("{demangled:#}"));
    }

    if let Some(body) = itanium_body(name) {
        return ItaniumParser::new(body).parse();
    }

    if let Some(decorated) = name.strip_prefix('?') {
        return MsvcParser::new(decorated).parse();
    }

    split_qualified(name)
}

/// Strip the `_Z` prefix and any vendor clone suffix (`.cold`, `.constprop.0`).
fn itanium_body(name: &str) -> Option<&str>
{
    let body = name.strip_prefix("__Z").or_else(|| name.strip_prefix("_Z"))?;
    Some(body.split_once('.').map_or(body, |(head, _)| head))
}

/// Split a demangled, human-readable name on top-level `::`.
fn split_qualified(text: &str) -> Option<ScopePath>
{
    let text = text.replace("`anonymous namespace'", ANONYMOUS_NAMESPACE);
    let mut path = ScopePath::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut rest = text.as_str();

    while let Some(c) = rest.chars().next() {
        rest = &rest[c.len_utf8()..];
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            '(' if depth == 0 => {
                let Some(after) = rest.strip_prefix("anonymous namespace)") else {
                    // Start of the parameter list.
                    break;
                };
                current.push_str(ANONYMOUS_NAMESPACE);
                rest = after;
            }
            ':' if depth == 0 && rest.starts_with(':') => {
                rest = &rest[1..];
                push_component(&mut path, &current);
                current.clear();
            }
            _ if depth == 0 => current.push(c),
            _ => {}
        }
    }
    push_component(&mut path, &current);

    // "void Suite_Case_Test::TestBody" carries its return type in front.
    if let Some(first) = path.first_mut() {
        if first != ANONYMOUS_NAMESPACE {
            if let Some((_, name)) = first.rsplit_once(' ') {
                *first = name.to_string();
            }
        }
    }

    (!path.is_empty()).then_some(path)
}

fn push_component(path: &mut ScopePath, component: &str)
{
    let component = component.trim();
    if !component.is_empty() {
        path.push(component.to_string());
    }
}

/// Decoder for the name part of Itanium `<encoding>`s.
struct ItaniumParser<'a>
{
    input: &'a [u8],
    pos: usize,
}

impl<'a> ItaniumParser<'a>
{
    fn new(input: &'a str) -> Self
    {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Option<ScopePath>
    {
        match self.peek()? {
            b'N' => {
                self.pos += 1;
                self.nested_name()
            }
            // Local entities are scoped inside another function.
            b'Z' => None,
            _ => self.unscoped_name(),
        }
    }

    fn unscoped_name(&mut self) -> Option<ScopePath>
    {
        let mut path = ScopePath::new();
        if self.eat(b"St") {
            path.push("std".to_string());
        }
        self.eat(b"L");
        path.push(self.source_name()?);
        Some(path)
    }

    fn nested_name(&mut self) -> Option<ScopePath>
    {
        while matches!(self.peek()?, b'r' | b'V' | b'K' | b'R' | b'O') {
            self.pos += 1;
        }

        let mut path = ScopePath::new();
        loop {
            match self.peek()? {
                b'E' => {
                    self.pos += 1;
                    break;
                }
                b'0'..=b'9' => path.push(self.source_name()?),
                b'I' => {
                    self.pos += 1;
                    self.skip_template_args()?;
                }
                b'B' => {
                    // ABI tag, e.g. B5cxx11
                    self.pos += 1;
                    self.source_name()?;
                }
                b'L' => self.pos += 1,
                b'S' => {
                    let expansion: &[&str] = match self.input.get(self.pos + 1)? {
                        b't' => &["std"],
                        b'a' => &["std", "allocator"],
                        b'b' => &["std", "basic_string"],
                        b's' => &["std", "string"],
                        _ => return None,
                    };
                    self.pos += 2;
                    path.extend(expansion.iter().map(|s| (*s).to_string()));
                }
                b'C' if self.input.get(self.pos + 1).is_some_and(u8::is_ascii_digit) => {
                    self.pos += 2;
                    path.push(CONSTRUCTOR.to_string());
                }
                b'D' if matches!(self.input.get(self.pos + 1), Some(b'0'..=b'2')) => {
                    self.pos += 2;
                    path.push(DESTRUCTOR.to_string());
                }
                _ => return None,
            }
        }

        (!path.is_empty()).then_some(path)
    }

    fn source_name(&mut self) -> Option<String>
    {
        let len = self.number()?;
        let end = self.pos.checked_add(len)?;
        let bytes = self.input.get(self.pos..end)?;
        self.pos = end;
        let name = std::str::from_utf8(bytes).ok()?;
        if name.starts_with("_GLOBAL__N") {
            Some(ANONYMOUS_NAMESPACE.to_string())
        } else {
            Some(name.to_string())
        }
    }

    fn number(&mut self) -> Option<usize>
    {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        std::str::from_utf8(self.input.get(start..self.pos)?).ok()?.parse().ok()
    }

    /// Skip `<template-args>` after the opening `I` has been consumed.
    fn skip_template_args(&mut self) -> Option<()>
    {
        let mut depth = 1usize;
        while depth > 0 {
            match self.peek()? {
                b'0'..=b'9' => {
                    self.source_name()?;
                }
                b'I' | b'N' | b'X' | b'J' => {
                    depth += 1;
                    self.pos += 1;
                }
                b'E' => {
                    depth -= 1;
                    self.pos += 1;
                }
                b'L' => {
                    self.pos += 1;
                    if self.eat(b"_Z") {
                        depth += 1;
                    } else {
                        // Literal: type, value, E
                        while self.peek()? != b'E' {
                            self.pos += 1;
                        }
                        self.pos += 1;
                    }
                }
                b'S' | b'T' => {
                    self.pos += 1;
                    if self.peek()?.is_ascii_lowercase() {
                        self.pos += 1;
                    } else {
                        while self.peek()? != b'_' {
                            self.pos += 1;
                        }
                        self.pos += 1;
                    }
                }
                _ => self.pos += 1,
            }
        }
        Some(())
    }

    fn peek(&self) -> Option<u8>
    {
        self.input.get(self.pos).copied()
    }

    fn eat(&mut self, prefix: &[u8]) -> bool
    {
        if self.input.get(self.pos..).is_some_and(|rest| rest.starts_with(prefix)) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }
}

/// Decoder for the qualified name of MSVC decorated symbols.
struct MsvcParser<'a>
{
    input: &'a [u8],
    pos: usize,
    backrefs: Vec<String>,
}

impl<'a> MsvcParser<'a>
{
    fn new(input: &'a str) -> Self
    {
        Self {
            input: input.as_bytes(),
            pos: 0,
            backrefs: Vec::new(),
        }
    }

    fn parse(mut self) -> Option<ScopePath>
    {
        let mut path = ScopePath::new();
        if self.eat(b"?0") {
            path.push(CONSTRUCTOR.to_string());
        } else if self.eat(b"?1") {
            path.push(DESTRUCTOR.to_string());
        } else {
            path.push(self.fragment()?);
        }

        loop {
            if self.eat(b"@") {
                break;
            }
            path.push(self.fragment()?);
        }

        path.reverse();
        Some(path)
    }

    fn fragment(&mut self) -> Option<String>
    {
        match self.peek()? {
            digit @ b'0'..=b'9' => {
                self.pos += 1;
                self.backrefs.get(usize::from(digit - b'0')).cloned()
            }
            b'?' => {
                if self.eat(b"?$") {
                    self.template_name()
                } else if self.eat(b"?A") {
                    self.read_until_at()?;
                    Some(ANONYMOUS_NAMESPACE.to_string())
                } else {
                    None
                }
            }
            _ => {
                let name = self.read_until_at()?;
                self.remember(&name);
                Some(name)
            }
        }
    }

    /// `?$name@args@`, with the `?$` already consumed.
    fn template_name(&mut self) -> Option<String>
    {
        let name = self.read_until_at()?;
        // Template arguments keep their own back-reference table.
        let mut args = MsvcParser {
            input: self.input,
            pos: self.pos,
            backrefs: Vec::new(),
        };
        while !args.eat(b"@") {
            args.skip_type()?;
        }
        self.pos = args.pos;
        self.remember(&name);
        Some(name)
    }

    fn skip_type(&mut self) -> Option<()>
    {
        let code = self.peek()?;
        self.pos += 1;
        match code {
            b'C'..=b'O' | b'X' => Some(()),
            b'_' => {
                self.pos += 1;
                Some(())
            }
            b'V' | b'U' | b'T' => self.skip_qualified_name(),
            b'W' => {
                self.pos += 1;
                self.skip_qualified_name()
            }
            b'A' | b'B' | b'P' | b'Q' | b'R' | b'S' => {
                self.eat(b"E");
                if !matches!(self.peek()?, b'A'..=b'D') {
                    return None;
                }
                self.pos += 1;
                self.skip_type()
            }
            b'$' if self.eat(b"0") => self.skip_number(),
            _ => None,
        }
    }

    fn skip_qualified_name(&mut self) -> Option<()>
    {
        while !self.eat(b"@") {
            self.fragment()?;
        }
        Some(())
    }

    fn skip_number(&mut self) -> Option<()>
    {
        self.eat(b"?");
        if self.peek()?.is_ascii_digit() {
            self.pos += 1;
            return Some(());
        }
        self.read_until_at().map(|_| ())
    }

    fn read_until_at(&mut self) -> Option<String>
    {
        let rest = self.input.get(self.pos..)?;
        let len = rest.iter().position(|&c| c == b'@')?;
        let name = std::str::from_utf8(&rest[..len]).ok()?.to_string();
        self.pos += len + 1;
        Some(name)
    }

    fn remember(&mut self, name: &str)
    {
        if self.backrefs.len() < 10 && !name.is_empty() {
            self.backrefs.push(name.to_string());
        }
    }

    fn peek(&self) -> Option<u8>
    {
        self.input.get(self.pos).copied()
    }

    fn eat(&mut self, prefix: &[u8]) -> bool
    {
        if self.input.get(self.pos..).is_some_and(|rest| rest.starts_with(prefix)) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn path(name: &str) -> Vec<String>
    {
        scope_components(name).map(|p| p.into_vec()).unwrap_or_default()
    }

    #[test]
    fn test_itanium_simple_test_body()
    {
        assert_eq!(path("_ZN15Suite_Case_Test8TestBodyEv"), ["Suite_Case_Test", "TestBody"]);
        assert_eq!(path("__ZN15Suite_Case_Test8TestBodyEv"), ["Suite_Case_Test", "TestBody"]);
    }

    #[test]
    fn test_itanium_drops_template_args_and_qualifiers()
    {
        assert_eq!(
            path("_ZN2ns15Suite_Case_TestIiE8TestBodyEv"),
            ["ns", "Suite_Case_Test", "TestBody"]
        );
        assert_eq!(
            path("_ZN15Suite_Case_TestINSt3__16vectorIiNS0_9allocatorIiEEEEE8TestBodyEv"),
            ["Suite_Case_Test", "TestBody"]
        );
        assert_eq!(path("_ZNK3Foo3barEv"), ["Foo", "bar"]);
        assert_eq!(path("_ZN15Suite_Case_Test8TestBodyEv.cold"), ["Suite_Case_Test", "TestBody"]);
    }

    #[test]
    fn test_itanium_anonymous_namespace()
    {
        assert_eq!(
            path("_ZN12_GLOBAL__N_115Suite_Case_Test8TestBodyEv"),
            [ANONYMOUS_NAMESPACE, "Suite_Case_Test", "TestBody"]
        );
    }

    #[test]
    fn test_itanium_unscoped_and_local_names()
    {
        assert_eq!(path("_Z4mainv"), ["main"]);
        assert_eq!(path("_ZSt9terminatev"), ["std", "terminate"]);
        assert!(scope_components("_ZZ4mainE1x").is_none());
        assert!(scope_components("_ZN3foo").is_none());
    }

    #[test]
    fn test_msvc_decorated_names()
    {
        assert_eq!(path("?TestBody@Suite_Case_Test@@UAEXXZ"), ["Suite_Case_Test", "TestBody"]);
        assert_eq!(
            path("?TestBody@Suite_Case_Test@ns@@UEAAXXZ"),
            ["ns", "Suite_Case_Test", "TestBody"]
        );
        assert_eq!(path("?TestBody@?$Suite_Case_Test@H@@UAEXXZ"), ["Suite_Case_Test", "TestBody"]);
        assert_eq!(
            path("?TestBody@?$Bar@V?$vector@HV?$allocator@H@std@@@std@@@gtest_case_Foo_@@UEAAXXZ"),
            ["gtest_case_Foo_", "Bar", "TestBody"]
        );
        assert_eq!(path("??0Foo@@QAE@XZ"), ["Foo", CONSTRUCTOR]);
    }

    #[test]
    fn test_demangled_names()
    {
        assert_eq!(path("Suite_Case_Test::TestBody"), ["Suite_Case_Test", "TestBody"]);
        assert_eq!(
            path("void __cdecl ns::Suite_Case_Test<int, std::pair<int, int> >::TestBody(void)"),
            ["ns", "Suite_Case_Test", "TestBody"]
        );
        assert_eq!(
            path("`anonymous namespace'::Suite_Case_Test::TestBody"),
            [ANONYMOUS_NAMESPACE, "Suite_Case_Test", "TestBody"]
        );
        assert_eq!(
            path("(anonymous namespace)::Suite_Case_Test::TestBody() const"),
            [ANONYMOUS_NAMESPACE, "Suite_Case_Test", "TestBody"]
        );
    }

    #[test]
    fn test_rust_symbols_lose_their_hash()
    {
        assert_eq!(
            path("_ZN7resolve15Suite_Case_Test8TestBody17h0123456789abcdefE"),
            ["resolve", "Suite_Case_Test", "TestBody"]
        );
    }

    #[test]
    fn test_empty_and_garbage()
    {
        assert!(scope_components("").is_none());
        assert!(scope_components("   ").is_none());
        assert!(scope_components("?").is_none());
    }
}
