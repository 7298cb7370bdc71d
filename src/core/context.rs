/// Render context: recursion depth tracking for nested composites.

use crate::core::render::RenderError;

/// Default nesting limit for composite descriptors.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Per-call state threaded through one render. Created fresh for every
/// top-level call, so independent renders share nothing.
#[derive(Debug, Clone)]
pub struct RenderContext {
    depth: usize,
    max_depth: usize,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl RenderContext {
    pub fn new(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Enter one level of nesting, failing once the limit is passed.
    pub fn descend(&mut self) -> Result<(), RenderError> {
        if self.depth >= self.max_depth {
            return Err(RenderError::DepthLimit(self.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_default() {
        let ctx = RenderContext::default();
        assert_eq!(ctx.depth(), 0);
        assert!(format!("{:?}", ctx).contains("RenderContext"));
    }

    #[test]
    fn descend_until_limit() {
        let mut ctx = RenderContext::new(2);
        ctx.descend().unwrap();
        ctx.descend().unwrap();
        assert!(matches!(ctx.descend(), Err(RenderError::DepthLimit(2))));
        ctx.ascend();
        assert_eq!(ctx.depth(), 1);
        ctx.descend().unwrap();
    }

    #[test]
    fn ascend_never_underflows() {
        let mut ctx = RenderContext::new(1);
        ctx.ascend();
        assert_eq!(ctx.depth(), 0);
    }
}
