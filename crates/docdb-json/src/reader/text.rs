//! Forward-only tokenizer over a text payload.
//!
//! Syntax is validated as tokens are produced: bracket balance, comma and
//! colon placement, string escapes and the sigil grammar of every scalar.

use crate::error::{JsonError, Result};
use crate::text::{decode_string, find_ending_quote, parse_scalar, skip_whitespace};
use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Root,
    ArrayFirstValueOrEnd,
    ArrayCommaOrEnd,
    ObjectFirstNameOrEnd,
    ObjectCommaOrEnd,
    ObjectValue,
    Done,
}

#[derive(Debug, Clone)]
pub struct TextReader<'a> {
    buf: &'a [u8],
    pos: usize,
    /// `true` for an open object, `false` for an open array.
    stack: Vec<bool>,
    state: State,
    current: Option<Token<'a>>,
}

impl<'a> TextReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            stack: Vec::new(),
            state: State::Root,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Token<'a>> {
        self.current.as_ref()
    }

    pub fn take_current(&mut self) -> Option<Token<'a>> {
        self.current.take()
    }

    pub fn advance(&mut self) -> Result<bool> {
        self.current = None;
        self.pos = skip_whitespace(self.buf, self.pos);
        let next = self.buf.get(self.pos).copied();
        let token = match (self.state, next) {
            (State::Done, None) => return Ok(false),
            (State::Done, Some(_)) => return Err(JsonError::TrailingData { offset: self.pos }),
            (_, None) => return Err(JsonError::UnexpectedEof { offset: self.pos }),
            (State::ArrayFirstValueOrEnd, Some(b']')) => self.end_container(),
            (State::Root | State::ArrayFirstValueOrEnd, Some(_)) => self.read_value()?,
            (State::ArrayCommaOrEnd, Some(b']')) => self.end_container(),
            (State::ArrayCommaOrEnd, Some(b',')) => {
                self.pos = skip_whitespace(self.buf, self.pos + 1);
                self.read_value()?
            }
            (State::ArrayCommaOrEnd, Some(_)) => {
                return Err(JsonError::text(self.pos, "expected ',' or ']'"))
            }
            (State::ObjectFirstNameOrEnd, Some(b'}')) => self.end_container(),
            (State::ObjectFirstNameOrEnd, Some(_)) => self.read_name()?,
            (State::ObjectCommaOrEnd, Some(b'}')) => self.end_container(),
            (State::ObjectCommaOrEnd, Some(b',')) => {
                self.pos = skip_whitespace(self.buf, self.pos + 1);
                self.read_name()?
            }
            (State::ObjectCommaOrEnd, Some(_)) => {
                return Err(JsonError::text(self.pos, "expected ',' or '}'"))
            }
            (State::ObjectValue, Some(b':')) => {
                self.pos = skip_whitespace(self.buf, self.pos + 1);
                self.read_value()?
            }
            (State::ObjectValue, Some(_)) => return Err(JsonError::text(self.pos, "expected ':'")),
        };
        self.current = Some(token);
        Ok(true)
    }

    fn read_value(&mut self) -> Result<Token<'a>> {
        match self.buf.get(self.pos) {
            None => Err(JsonError::UnexpectedEof { offset: self.pos }),
            Some(b'[') => {
                self.stack.push(false);
                self.pos += 1;
                self.state = State::ArrayFirstValueOrEnd;
                Ok(Token::BeginArray)
            }
            Some(b'{') => {
                self.stack.push(true);
                self.pos += 1;
                self.state = State::ObjectFirstNameOrEnd;
                Ok(Token::BeginObject)
            }
            Some(_) => {
                let (token, end) = parse_scalar(self.buf, self.pos)?;
                self.pos = end;
                self.state = self.after_value();
                Ok(token)
            }
        }
    }

    fn read_name(&mut self) -> Result<Token<'a>> {
        match self.buf.get(self.pos) {
            Some(b'"') => {
                let start = self.pos;
                let end = find_ending_quote(self.buf, start + 1)?;
                let name = decode_string(&self.buf[start + 1..end], start)?;
                self.pos = end + 1;
                self.state = State::ObjectValue;
                Ok(Token::FieldName(name))
            }
            None => Err(JsonError::UnexpectedEof { offset: self.pos }),
            Some(_) => Err(JsonError::text(self.pos, "expected property name")),
        }
    }

    fn end_container(&mut self) -> Token<'a> {
        let object = self.stack.pop().unwrap_or(false);
        self.pos += 1;
        self.state = self.after_value();
        if object {
            Token::EndObject
        } else {
            Token::EndArray
        }
    }

    fn after_value(&self) -> State {
        match self.stack.last() {
            None => State::Done,
            Some(false) => State::ArrayCommaOrEnd,
            Some(true) => State::ObjectCommaOrEnd,
        }
    }
}
