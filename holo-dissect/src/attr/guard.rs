//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//
// Sponsored by NLnet as part of the Next Generation Internet initiative.
// See: https://nlnet.nl/NGI0
//

use std::ops::{Deref, DerefMut};

// Nesting depth tracker, created fresh for every decoded PDU.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecursionGuard {
    depth: u32,
    max_depth: u32,
}

// Returned when a descent would exceed the maximum depth.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DepthExceeded {
    pub depth: u32,
    pub max_depth: u32,
}

// Types that own a recursion guard and can therefore be descended into.
pub trait Guarded {
    fn guard_mut(&mut self) -> &mut RecursionGuard;
}

/// One level of descent into a nested registry.
///
/// The level is released when the scope is dropped, on every exit path of
/// the code holding it. The scope dereferences to the guarded value so the
/// nested walk keeps full access to it.
#[derive(Debug)]
pub struct DepthScope<'a, T: Guarded> {
    inner: &'a mut T,
}

// ===== impl RecursionGuard =====

impl RecursionGuard {
    pub const DFLT_MAX_DEPTH: u32 = 5;

    pub fn new(max_depth: u32) -> Self {
        RecursionGuard {
            depth: 0,
            max_depth,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    // Checks whether one more level can be entered.
    pub fn check(&self) -> Result<(), DepthExceeded> {
        if self.depth >= self.max_depth {
            return Err(DepthExceeded {
                depth: self.depth,
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }

    fn enter(&mut self) -> Result<(), DepthExceeded> {
        self.check()?;
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

impl Default for RecursionGuard {
    fn default() -> RecursionGuard {
        RecursionGuard::new(RecursionGuard::DFLT_MAX_DEPTH)
    }
}

impl Guarded for RecursionGuard {
    fn guard_mut(&mut self) -> &mut RecursionGuard {
        self
    }
}

// ===== impl DepthExceeded =====

impl std::fmt::Display for DepthExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "maximum nesting depth reached ({} of {})",
            self.depth, self.max_depth
        )
    }
}

impl std::error::Error for DepthExceeded {}

// ===== impl DepthScope =====

impl<'a, T: Guarded> DepthScope<'a, T> {
    pub fn enter(inner: &'a mut T) -> Result<Self, DepthExceeded> {
        inner.guard_mut().enter()?;
        Ok(DepthScope { inner })
    }
}

impl<T: Guarded> Deref for DepthScope<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.inner
    }
}

impl<T: Guarded> DerefMut for DepthScope<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.inner
    }
}

impl<T: Guarded> Drop for DepthScope<'_, T> {
    fn drop(&mut self) {
        self.inner.guard_mut().leave();
    }
}

// ===== unit tests =====
