//! Lazy child sequences.

use super::{Navigator, NavigatorNode, ObjectProperty};
use crate::error::{JsonError, Result};

/// Position inside a container's child sequence.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ChildCursor {
    Text { pos: usize },
    Binary { pos: usize, end: usize, scope: usize },
}

impl ChildCursor {
    pub(crate) fn next(&mut self, navigator: &Navigator<'_>) -> Result<Option<NavigatorNode>> {
        match (self, navigator) {
            (ChildCursor::Binary { pos, end, scope }, Navigator::Binary(nav)) => {
                nav.next_child(pos, *end, *scope)
            }
            (ChildCursor::Text { pos }, Navigator::Text(nav)) => nav.next_child(pos),
            _ => Ok(None),
        }
    }
}

/// Items of an array, in order. Stops after the first error.
#[derive(Debug, Clone)]
pub struct ArrayItems<'n, 'a> {
    navigator: &'n Navigator<'a>,
    cursor: ChildCursor,
    done: bool,
}

impl<'n, 'a> ArrayItems<'n, 'a> {
    pub(crate) fn new(navigator: &'n Navigator<'a>, cursor: ChildCursor) -> Self {
        Self {
            navigator,
            cursor,
            done: false,
        }
    }
}

impl Iterator for ArrayItems<'_, '_> {
    type Item = Result<NavigatorNode>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.cursor.next(self.navigator) {
            Ok(Some(node)) => Some(Ok(node)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// `(name, value)` pairs of an object, in encoded order. Stops after the
/// first error.
#[derive(Debug, Clone)]
pub struct ObjectProperties<'n, 'a> {
    navigator: &'n Navigator<'a>,
    cursor: ChildCursor,
    done: bool,
}

impl<'n, 'a> ObjectProperties<'n, 'a> {
    pub(crate) fn new(navigator: &'n Navigator<'a>, cursor: ChildCursor) -> Self {
        Self {
            navigator,
            cursor,
            done: false,
        }
    }

    fn next_property(&mut self) -> Result<Option<ObjectProperty>> {
        let Some(name) = self.cursor.next(self.navigator)? else {
            return Ok(None);
        };
        let value = self
            .cursor
            .next(self.navigator)?
            .ok_or(JsonError::ContainerOverrun { offset: name.offset })?;
        Ok(Some(ObjectProperty {
            name: name.as_field_name(),
            value,
        }))
    }
}

impl Iterator for ObjectProperties<'_, '_> {
    type Item = Result<ObjectProperty>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.next_property();
        if !matches!(next, Ok(Some(_))) {
            self.done = true;
        }
        next.transpose()
    }
}
