//! Permissive CSS grammar stream built on the `cssparser` tokenizer.
//!
//! A stylesheet becomes a flat list of [`CssEvent`]s. Anything the stream does
//! not understand turns into [`CssEvent::Ignored`] instead of an error, and
//! the list always ends with a single [`CssEvent::End`].

use cssparser::{ParseError, Parser, ParserInput, Token};

/// Grouping at-rules whose blocks contain ordinary rulesets.
const GROUPING_AT_RULES: &[&str] = &["media", "supports", "layer", "document", "container"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssEvent {
    /// A ruleset opened; `selector` is its prelude, trimmed but otherwise verbatim.
    BeginRuleset { selector: String },
    /// `property: value` inside a ruleset or declaration list. The property
    /// name is ASCII-lowercased; the value is the trimmed source text.
    Declaration { property: String, value: String },
    EndRuleset,
    /// Syntax this stream does not model (non-grouping at-rules, nested
    /// rules, stray tokens).
    Ignored,
    End,
}

/// Events for a full stylesheet.
pub fn stylesheet_events(css: &str) -> Vec<CssEvent> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut events = Vec::new();
    parse_rule_list(&mut parser, &mut events);
    events.push(CssEvent::End);
    events
}

/// Events for a bare declaration list such as a `style` attribute.
pub fn declaration_events(css: &str) -> Vec<CssEvent> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut events = Vec::new();
    parse_declaration_list(&mut parser, &mut events);
    events.push(CssEvent::End);
    events
}

/// Next non-whitespace token, detached from the parser borrow.
pub(crate) fn next_token<'i>(parser: &mut Parser<'i, '_>) -> Option<Token<'i>> {
    parser.next().ok().cloned()
}

fn parse_rule_list<'i>(parser: &mut Parser<'i, '_>, events: &mut Vec<CssEvent>) {
    loop {
        let state = parser.state();
        let Some(token) = next_token(parser) else {
            return;
        };
        match token {
            Token::CDO | Token::CDC | Token::Semicolon => {}
            Token::AtKeyword(name) => parse_at_rule(parser, &name, events),
            _ => {
                parser.reset(&state);
                parse_qualified_rule(parser, events);
            }
        }
    }
}

fn parse_at_rule<'i>(parser: &mut Parser<'i, '_>, name: &str, events: &mut Vec<CssEvent>) {
    let grouping = GROUPING_AT_RULES
        .iter()
        .any(|rule| name.eq_ignore_ascii_case(rule));
    while let Some(token) = next_token(parser) {
        match token {
            Token::Semicolon => break,
            Token::CurlyBracketBlock => {
                if grouping {
                    let _ = parser.parse_nested_block(|block| {
                        parse_rule_list(block, events);
                        Ok::<(), ParseError<'i, ()>>(())
                    });
                    return;
                }
                // The unread block is skipped by the next call to `next`.
                break;
            }
            _ => {}
        }
    }
    events.push(CssEvent::Ignored);
}

fn parse_qualified_rule<'i>(parser: &mut Parser<'i, '_>, events: &mut Vec<CssEvent>) {
    parser.skip_whitespace();
    let start = parser.position();
    loop {
        let before = parser.position();
        let Some(token) = next_token(parser) else {
            // Prelude without a block.
            events.push(CssEvent::Ignored);
            return;
        };
        if let Token::CurlyBracketBlock = token {
            let selector = parser.slice(start..before).trim().to_string();
            events.push(CssEvent::BeginRuleset { selector });
            let _ = parser.parse_nested_block(|block| {
                parse_declaration_list(block, events);
                Ok::<(), ParseError<'i, ()>>(())
            });
            events.push(CssEvent::EndRuleset);
            return;
        }
    }
}

fn parse_declaration_list<'i>(parser: &mut Parser<'i, '_>, events: &mut Vec<CssEvent>) {
    while let Some(token) = next_token(parser) {
        match token {
            Token::Semicolon => {}
            Token::Ident(name) => match next_token(parser) {
                Some(Token::Colon) => parse_declaration_value(parser, &name, events),
                Some(Token::Semicolon) => events.push(CssEvent::Ignored),
                Some(_) => {
                    skip_declaration(parser);
                    events.push(CssEvent::Ignored);
                }
                None => {
                    events.push(CssEvent::Ignored);
                    return;
                }
            },
            _ => {
                skip_declaration(parser);
                events.push(CssEvent::Ignored);
            }
        }
    }
}

fn parse_declaration_value<'i>(parser: &mut Parser<'i, '_>, name: &str, events: &mut Vec<CssEvent>) {
    let start = parser.position();
    let end = loop {
        let before = parser.position();
        match next_token(parser) {
            None => break parser.position(),
            Some(Token::Semicolon) => break before,
            Some(Token::CurlyBracketBlock) => {
                // `a:hover { ... }` nested inside a ruleset; not a declaration.
                events.push(CssEvent::Ignored);
                return;
            }
            Some(_) => {}
        }
    };
    let value = parser.slice(start..end).trim();
    if value.is_empty() {
        events.push(CssEvent::Ignored);
        return;
    }
    events.push(CssEvent::Declaration {
        property: name.to_ascii_lowercase(),
        value: value.to_string(),
    });
}

/// Consume tokens up to and including the next `;`. A `{}` block also ends
/// the construct.
fn skip_declaration(parser: &mut Parser<'_, '_>) {
    while let Some(token) = next_token(parser) {
        if matches!(token, Token::Semicolon | Token::CurlyBracketBlock) {
            return;
        }
    }
}
