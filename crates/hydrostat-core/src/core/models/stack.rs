use super::error::ModelError;
use super::shell::Shell;
use std::ops::Deref;

/// Maximum number of layers a model can hold.
pub const CAPACITY: usize = 20;

/// Fixed-capacity, inline list of layers ordered from the innermost (index 0)
/// outward.
///
/// Storage never reallocates, which keeps a [`super::model::Model`] a flat
/// value that maps one-to-one onto the wire records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShellStack {
    shells: [Shell; CAPACITY],
    len: usize,
}

impl Default for ShellStack {
    fn default() -> Self {
        Self {
            shells: [Shell::default(); CAPACITY],
            len: 0,
        }
    }
}

impl ShellStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slice(shells: &[Shell]) -> Result<Self, ModelError> {
        let mut stack = Self::new();
        for shell in shells {
            stack.push(*shell)?;
        }
        Ok(stack)
    }

    /// Appends a layer outside the current outermost one.
    pub fn push(&mut self, shell: Shell) -> Result<(), ModelError> {
        if self.len == CAPACITY {
            return Err(ModelError::capacity_exceeded());
        }
        self.shells[self.len] = shell;
        self.len += 1;
        Ok(())
    }

    pub fn as_slice(&self) -> &[Shell] {
        &self.shells[..self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [Shell] {
        &mut self.shells[..self.len]
    }
}

impl Deref for ShellStack {
    type Target = [Shell];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<'a> IntoIterator for &'a ShellStack {
    type Item = &'a Shell;
    type IntoIter = std::slice::Iter<'a, Shell>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere(radius: f64) -> Shell {
        Shell::sphere(radius, 1.0).unwrap()
    }

    #[test]
    fn push_appends_until_capacity() {
        let mut stack = ShellStack::new();
        for i in 0..CAPACITY {
            stack.push(sphere(1.0 + i as f64)).unwrap();
        }
        assert_eq!(stack.len(), CAPACITY);
        assert_eq!(
            stack.push(sphere(0.5)),
            Err(ModelError::CapacityExceeded { capacity: CAPACITY })
        );
    }

    #[test]
    fn slices_only_expose_live_layers() {
        let stack = ShellStack::from_slice(&[sphere(2.0), sphere(1.0)]).unwrap();
        assert_eq!(stack.as_slice().len(), 2);
        assert_eq!(stack[1].a, 1.0);
        assert_eq!(stack.iter().count(), 2);
    }

    #[test]
    fn from_slice_rejects_too_many_layers() {
        let shells = vec![sphere(1.0); CAPACITY + 1];
        assert!(ShellStack::from_slice(&shells).is_err());
    }

    #[test]
    fn empty_stack_is_empty() {
        let stack = ShellStack::new();
        assert!(stack.is_empty());
        assert_eq!((&stack).into_iter().count(), 0);
    }
}
