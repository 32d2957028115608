//! Lexical frames for one evaluation.
//!
//! Frame 0 is the root frame of the expression. Calling a local function
//! pushes a frame whose parent is the frame the function was defined in, not
//! the caller's, so lookups follow the lexical chain. Frames are discarded
//! when the call returns.

use std::sync::Arc;

use ecow::EcoString;
use hashbrown::HashMap;

use crate::{values::Value, vm::LocalFunction};

pub(crate) const ROOT: usize = 0;

/// A local function together with the frame it was defined in.
#[derive(Debug, Clone)]
pub(crate) struct Closure {
    pub definition: Arc<LocalFunction>,
    pub env: usize,
}

#[derive(Debug, Default)]
struct Frame {
    parent: Option<usize>,
    variables: HashMap<EcoString, Value>,
    functions: HashMap<usize, Closure>,
}

#[derive(Debug)]
pub(crate) struct Frames {
    frames: Vec<Frame>,
}

impl Frames {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Pushes an empty frame under `parent` and returns its index.
    pub fn push(&mut self, parent: usize) -> usize {
        self.frames.push(Frame {
            parent: Some(parent),
            ..Frame::default()
        });
        self.frames.len() - 1
    }

    /// Discards frames created after the stack had `len` entries. The root
    /// frame always survives.
    pub fn truncate(&mut self, len: usize) {
        self.frames.truncate(len.max(1));
    }

    pub fn assign(&mut self, frame: usize, name: EcoString, value: Value) {
        if let Some(frame) = self.frames.get_mut(frame) {
            frame.variables.insert(name, value);
        }
    }

    pub fn define(&mut self, frame: usize, definition: Arc<LocalFunction>) {
        if let Some(target) = self.frames.get_mut(frame) {
            let slot = definition.slot;
            target.functions.insert(slot, Closure { definition, env: frame });
        }
    }

    pub fn variable(&self, frame: usize, name: &str) -> Option<&Value> {
        self.chain(frame).find_map(|f| f.variables.get(name))
    }

    pub fn function(&self, frame: usize, slot: usize) -> Option<&Closure> {
        self.chain(frame).find_map(|f| f.functions.get(&slot))
    }

    fn chain(&self, start: usize) -> impl Iterator<Item = &Frame> {
        let mut next = Some(start);
        core::iter::from_fn(move || {
            let frame = self.frames.get(next?)?;
            next = frame.parent;
            Some(frame)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::Code;

    fn definition(name: &str, slot: usize) -> Arc<LocalFunction> {
        Arc::new(LocalFunction {
            name: name.into(),
            slot,
            params: vec![],
            body: Code::new(),
        })
    }

    #[test]
    fn test_lookup_walks_parents() {
        let mut frames = Frames::new();
        frames.assign(ROOT, "x".into(), Value::Number(1.0));
        let inner = frames.push(ROOT);
        frames.assign(inner, "y".into(), Value::Number(2.0));

        assert_eq!(frames.variable(inner, "x"), Some(&Value::Number(1.0)));
        assert_eq!(frames.variable(inner, "y"), Some(&Value::Number(2.0)));
        assert_eq!(frames.variable(ROOT, "y"), None);
    }

    #[test]
    fn test_inner_assignment_shadows() {
        let mut frames = Frames::new();
        frames.assign(ROOT, "x".into(), Value::Number(1.0));
        let inner = frames.push(ROOT);
        frames.assign(inner, "x".into(), Value::Number(5.0));

        assert_eq!(frames.variable(inner, "x"), Some(&Value::Number(5.0)));
        assert_eq!(frames.variable(ROOT, "x"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_closure_env_is_the_defining_frame() {
        let mut frames = Frames::new();
        let inner = frames.push(ROOT);
        frames.define(inner, definition("g", 3));

        let closure = frames.function(inner, 3).unwrap();
        assert_eq!(closure.env, inner);
        assert!(frames.function(ROOT, 3).is_none());
    }

    #[test]
    fn test_truncate_keeps_root() {
        let mut frames = Frames::new();
        frames.push(ROOT);
        frames.push(ROOT);
        frames.truncate(0);
        assert_eq!(frames.len(), 1);
    }
}
