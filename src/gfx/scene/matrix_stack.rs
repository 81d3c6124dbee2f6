use cgmath::Matrix4;

/// Accumulated root-to-node transforms during a traversal.
///
/// Depth of the stack at a node visit equals the node's depth in the tree; a balanced
/// traversal leaves it empty.
#[derive(Debug, Default, Clone)]
pub struct MatrixStack {
    matrices: Vec<Matrix4<f32>>,
}

impl MatrixStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            matrices: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, matrix: Matrix4<f32>) {
        self.matrices.push(matrix);
    }

    pub fn pop(&mut self) -> Option<Matrix4<f32>> {
        self.matrices.pop()
    }

    pub fn peek(&self) -> Option<&Matrix4<f32>> {
        self.matrices.last()
    }

    /// Top of the stack, or `base` when nothing has been pushed yet.
    pub fn top_or(&self, base: Matrix4<f32>) -> Matrix4<f32> {
        self.peek().copied().unwrap_or(base)
    }

    pub fn depth(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    pub fn clear(&mut self) {
        self.matrices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Vector3};

    #[test]
    fn push_pop_is_lifo() {
        let mut stack = MatrixStack::new();
        let a = Matrix4::from_translation(Vector3::new(1.0, 0.0, 0.0));
        let b = Matrix4::from_scale(2.0);
        stack.push(a);
        stack.push(b);
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.peek(), Some(&b));
        assert_eq!(stack.pop(), Some(b));
        assert_eq!(stack.pop(), Some(a));
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn top_or_falls_back_to_base() {
        let mut stack = MatrixStack::new();
        let base = Matrix4::from_scale(3.0);
        assert_eq!(stack.top_or(base), base);
        stack.push(Matrix4::identity());
        assert_eq!(stack.top_or(base), Matrix4::identity());
    }
}
