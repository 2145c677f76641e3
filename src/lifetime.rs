use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Owns the lifetime of a mounted view. Dropping it tears the view down.
#[derive(Debug)]
pub struct Mount {
    alive: Arc<AtomicBool>,
}

/// Cheap handle checked by async completions before they touch view state.
#[derive(Clone, Debug)]
pub struct AliveToken {
    alive: Arc<AtomicBool>,
}

impl Mount {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn token(&self) -> AliveToken {
        AliveToken {
            alive: self.alive.clone(),
        }
    }

    pub fn unmount(self) {
        drop(self);
    }
}

impl Default for Mount {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl AliveToken {
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::Mount;

    #[test]
    fn token_observes_unmount() {
        let mount = Mount::new();
        let token = mount.token();
        assert!(token.is_alive());
        mount.unmount();
        assert!(!token.is_alive());
    }
}
