//! Non-recursive parse state machine.
//!
//! The parser consumes the token stream while maintaining an explicit
//! stack of open containers, so nesting depth is bounded by
//! [`Limits::max_depth`] and never by the host call stack. Between tokens
//! it carries an expectation mask (object key, colon, array value, any
//! value, no value) that encodes which token kinds may legally appear
//! next; any other token fails immediately with a structural error.
//!
//! Values are staged in loosely typed [`Container`] nodes first: numbers
//! and strings keep their lexeme/text, containers collect children in
//! document order. Only after the whole document has been accepted is the
//! staging tree converted, once, into a [`Value`] tree. That second phase
//! classifies number lexemes and collapses duplicate object keys
//! (last occurrence wins) while the `BTreeMap` establishes the canonical
//! ascending key order.

use std::collections::BTreeMap;

use crate::error::{Error, JsonResult};
use crate::lexer::{Lexer, Token};
use crate::limits::Limits;
use crate::number;
use crate::value::Value;

/// Constraint on the type of the document root, checked once after a
/// successful parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootShape {
    /// Reject any document whose root is not an object.
    RequireObject,
    /// Reject any document whose root is not an array.
    RequireArray,
    /// Accept any single JSON value as the document root.
    AcceptAnyValue,
}

/// Verify the completed tree against the requested root shape.
pub(crate) fn check_root_shape(value: &Value, shape: RootShape) -> JsonResult<()> {
    match shape {
        RootShape::RequireObject if !value.is_object() => Err(Error::Shape(format!(
            "expected an object at the document root, got {}",
            value.type_name()
        ))),
        RootShape::RequireArray if !value.is_array() => Err(Error::Shape(format!(
            "expected an array at the document root, got {}",
            value.type_name()
        ))),
        _ => Ok(()),
    }
}

// Expectation bits carried between tokens.
const EXP_OBJ_KEY: u8 = 1 << 0;
const EXP_COLON: u8 = 1 << 1;
const EXP_ARR_VALUE: u8 = 1 << 2;
const EXP_VALUE: u8 = 1 << 3;
const EXP_NOT_VALUE: u8 = 1 << 4;

/// Staging node for an in-progress value. Numbers and strings keep their
/// raw payload; object entries stay in first-seen order until conversion.
#[derive(Debug, Clone, PartialEq)]
enum Container {
    Null,
    Bool(bool),
    Num(String),
    Str(String),
    Arr(Vec<Container>),
    Obj(Vec<(String, Container)>),
}

impl Container {
    /// Convert the staging tree into the final value tree. Recursion here
    /// is safe: staging depth is capped by the parse depth bound.
    fn into_value(self) -> JsonResult<Value> {
        match self {
            Container::Null => Ok(Value::Null),
            Container::Bool(b) => Ok(Value::Bool(b)),
            Container::Num(lexeme) => number::convert(&lexeme),
            Container::Str(s) => Ok(Value::String(s)),
            Container::Arr(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(item.into_value()?);
                }
                Ok(Value::Array(values))
            }
            Container::Obj(entries) => {
                let mut map = BTreeMap::new();
                for (key, container) in entries {
                    // Sequential insertion: a repeated key overwrites the
                    // earlier occurrence.
                    map.insert(key, container.into_value()?);
                }
                Ok(Value::Object(map))
            }
        }
    }
}

/// Attach a completed container to the innermost open one.
fn attach(stack: &mut [Container], container: Container) -> JsonResult<()> {
    match stack.last_mut() {
        Some(Container::Obj(entries)) => match entries.last_mut() {
            Some(entry) => {
                entry.1 = container;
                Ok(())
            }
            None => Err(Error::InternalInvariant(
                "object value arrived with no open key".to_string(),
            )),
        },
        Some(Container::Arr(items)) => {
            items.push(container);
            Ok(())
        }
        _ => Err(Error::InternalInvariant(
            "attach target is not an open container".to_string(),
        )),
    }
}

/// Parse one JSON document from a byte buffer with this engine.
pub(crate) fn parse_slice(bytes: &[u8], limits: Limits) -> JsonResult<Value> {
    let mut lexer = Lexer::new(bytes, limits)?;

    let mut expect: u8 = 0;
    let mut stack: Vec<Container> = Vec::new();
    let mut root: Option<Container> = None;
    let mut last_was_comma = false;
    let mut last_was_arr_open = false;

    while root.is_none() {
        let tok = lexer.next_token()?;

        if tok == Token::Eof {
            return Err(Error::Structural("unexpected end of input".to_string()));
        }

        let opens_value = tok.is_scalar_value()
            || matches!(tok, Token::LeftBrace | Token::LeftBracket);

        // Expectation gates, most specific first.
        if expect & EXP_VALUE != 0 {
            if !opens_value {
                return Err(Error::Structural("expected a value".to_string()));
            }
            expect &= !EXP_VALUE;
        } else if expect & EXP_ARR_VALUE != 0 {
            if !opens_value && tok != Token::RightBracket {
                return Err(Error::Structural(
                    "expected an array value or ']'".to_string(),
                ));
            }
            expect &= !EXP_ARR_VALUE;
        } else if expect & EXP_OBJ_KEY != 0 {
            // Cleared where the key or the closing brace is consumed.
            if !matches!(tok, Token::RightBrace | Token::String(_)) {
                return Err(Error::Structural(
                    "expected an object key or '}'".to_string(),
                ));
            }
        } else if expect & EXP_COLON != 0 {
            if tok != Token::Colon {
                return Err(Error::Structural(
                    "expected ':' after object key".to_string(),
                ));
            }
            expect &= !EXP_COLON;
        } else if tok == Token::Colon {
            return Err(Error::Structural("unexpected ':'".to_string()));
        }

        if expect & EXP_NOT_VALUE != 0 {
            if opens_value {
                return Err(Error::Structural(
                    "value not allowed here".to_string(),
                ));
            }
            expect &= !EXP_NOT_VALUE;
        }

        let this_was_comma = tok == Token::Comma;
        let this_was_arr_open = tok == Token::LeftBracket;

        match tok {
            Token::LeftBrace | Token::LeftBracket => {
                let is_obj = tok == Token::LeftBrace;
                stack.push(if is_obj {
                    Container::Obj(Vec::new())
                } else {
                    Container::Arr(Vec::new())
                });
                if stack.len() > limits.max_depth {
                    return Err(Error::DepthExceeded {
                        depth: stack.len(),
                        max_depth: limits.max_depth,
                    });
                }
                expect |= if is_obj { EXP_OBJ_KEY } else { EXP_ARR_VALUE };
            }

            Token::RightBrace | Token::RightBracket => {
                if last_was_comma {
                    return Err(Error::Structural("trailing comma".to_string()));
                }
                let closes_obj = tok == Token::RightBrace;
                match stack.last() {
                    None => {
                        return Err(Error::Structural(
                            "close bracket with no open container".to_string(),
                        ));
                    }
                    Some(Container::Obj(_)) if !closes_obj => {
                        return Err(Error::Structural(
                            "']' closes an object".to_string(),
                        ));
                    }
                    Some(Container::Arr(_)) if closes_obj => {
                        return Err(Error::Structural(
                            "'}' closes an array".to_string(),
                        ));
                    }
                    Some(_) => {}
                }
                match stack.pop() {
                    Some(finished) => {
                        if stack.is_empty() {
                            root = Some(finished);
                        } else {
                            attach(&mut stack, finished)?;
                        }
                    }
                    None => {
                        return Err(Error::InternalInvariant(
                            "pop from empty container stack".to_string(),
                        ));
                    }
                }
                expect &= !EXP_OBJ_KEY;
                expect |= EXP_NOT_VALUE;
            }

            Token::Colon => {
                match stack.last() {
                    Some(Container::Obj(_)) => {}
                    _ => {
                        return Err(Error::Structural(
                            "':' outside an object".to_string(),
                        ));
                    }
                }
                expect |= EXP_VALUE;
            }

            Token::Comma => {
                if last_was_comma || last_was_arr_open {
                    return Err(Error::Structural("misplaced ','".to_string()));
                }
                match stack.last() {
                    Some(Container::Obj(_)) => expect |= EXP_OBJ_KEY,
                    Some(Container::Arr(_)) => expect |= EXP_ARR_VALUE,
                    _ => {
                        return Err(Error::Structural(
                            "',' outside a container".to_string(),
                        ));
                    }
                }
            }

            Token::Null | Token::True | Token::False | Token::Number(_) => {
                let staged = match tok {
                    Token::Null => Container::Null,
                    Token::True => Container::Bool(true),
                    Token::False => Container::Bool(false),
                    Token::Number(lexeme) => Container::Num(lexeme),
                    _ => {
                        return Err(Error::InternalInvariant(
                            "scalar arm reached by a non-scalar token".to_string(),
                        ));
                    }
                };
                if stack.is_empty() {
                    root = Some(staged);
                } else {
                    attach(&mut stack, staged)?;
                }
                expect |= EXP_NOT_VALUE;
            }

            Token::String(s) => {
                if expect & EXP_OBJ_KEY != 0 {
                    match stack.last_mut() {
                        Some(Container::Obj(entries)) => {
                            // Placeholder until the colon and value arrive.
                            entries.push((s, Container::Null));
                        }
                        _ => {
                            return Err(Error::InternalInvariant(
                                "object key arrived with no open object".to_string(),
                            ));
                        }
                    }
                    expect &= !EXP_OBJ_KEY;
                    expect |= EXP_COLON;
                } else if stack.is_empty() {
                    root = Some(Container::Str(s));
                } else {
                    attach(&mut stack, Container::Str(s))?;
                }
                expect |= EXP_NOT_VALUE;
            }

            Token::Eof => {
                return Err(Error::InternalInvariant(
                    "end of input reached the dispatch arm".to_string(),
                ));
            }
        }

        last_was_comma = this_was_comma;
        last_was_arr_open = this_was_arr_open;
    }

    // Exactly one construct per document: the next token must be Eof.
    if lexer.next_token()? != Token::Eof {
        return Err(Error::Structural(
            "trailing content after the document root".to_string(),
        ));
    }

    match root {
        Some(container) => container.into_value(),
        None => Err(Error::InternalInvariant(
            "parse loop ended without a root".to_string(),
        )),
    }
}
