use core::fmt;

use smallvec::SmallVec;

use crate::vm::RuntimeError;

/// Operand stack used by the VM.
///
/// Popping an empty stack is reported as [`RuntimeError::StackUnderflow`]
/// instead of panicking, so malformed code surfaces as an evaluation error.
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    pub fn pop(&mut self) -> Result<T, RuntimeError> {
        self.items.pop().ok_or(RuntimeError::StackUnderflow)
    }

    /// Pops the top `n` values, returned bottom to top.
    pub fn pop_n(&mut self, n: usize) -> Result<SmallVec<[T; 4]>, RuntimeError> {
        let Some(start) = self.items.len().checked_sub(n) else {
            return Err(RuntimeError::StackUnderflow);
        };
        Ok(self.items.drain(start..).collect())
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }
}

impl<T: fmt::Debug> fmt::Debug for Stack<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter().rev()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop() {
        let mut stack = Stack::with_capacity(2);
        stack.push(1);
        stack.push(2);
        assert_eq!(stack.pop(), Ok(2));
        assert_eq!(stack.peek(), Some(&1));
        assert_eq!(stack.pop(), Ok(1));
        assert_eq!(stack.peek(), None);
    }

    #[test]
    fn test_underflow() {
        let mut stack: Stack<i32> = Stack::with_capacity(0);
        assert_eq!(stack.pop(), Err(RuntimeError::StackUnderflow));
        stack.push(1);
        assert_eq!(stack.pop_n(2).unwrap_err(), RuntimeError::StackUnderflow);
        assert_eq!(stack.peek(), Some(&1));
    }

    #[test]
    fn test_pop_n_keeps_order() {
        let mut stack = Stack::with_capacity(8);
        for i in 0..5 {
            stack.push(i);
        }
        assert_eq!(stack.pop_n(3).unwrap().as_slice(), &[2, 3, 4]);
        assert_eq!(stack.pop_n(0).unwrap().len(), 0);
        assert_eq!(format!("{:?}", stack), "[1, 0]");
    }
}
