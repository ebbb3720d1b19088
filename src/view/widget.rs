//! Contracts for the two collaborators the session drives: the panel switcher
//! and the chart widget.

use super::chart::ChartConfig;
use anyhow::Result;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Panel {
    Menu,
    History,
    Graph,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Menu, Panel::History, Panel::Graph];

    pub fn id(&self) -> &'static str {
        match self {
            Panel::Menu => "menu-view",
            Panel::History => "view-history",
            Panel::Graph => "view-graph",
        }
    }
}

pub trait ViewManager {
    fn show(&mut self, panel: Panel);
    fn hide(&mut self, panel: Panel);
}

/// Drawing surface the widget paints on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface(pub String);

impl Default for Surface {
    fn default() -> Self {
        Surface("liquidityChart".to_string())
    }
}

/// A live chart. Must be disposed before another is built on the same surface.
pub trait ChartHandle {
    fn dispose(self);
}

pub trait ChartWidget {
    type Handle: ChartHandle;

    fn construct(&mut self, surface: &Surface, config: &ChartConfig) -> Result<Self::Handle>;
}

/// Owns at most one live chart handle.
pub struct ChartSlot<H: ChartHandle> {
    current: Option<H>,
}

impl<H: ChartHandle> Default for ChartSlot<H> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<H: ChartHandle> ChartSlot<H> {
    /// Disposes the current handle, if any, then stores the one `build` returns.
    /// When `build` fails the slot is left empty.
    pub fn replace_with<F>(&mut self, build: F) -> Result<&H>
    where
        F: FnOnce() -> Result<H>,
    {
        self.clear();
        let handle: &H = self.current.insert(build()?);
        Ok(handle)
    }

    pub fn clear(&mut self) {
        if let Some(old) = self.current.take() {
            debug!("disposing previous chart instance");
            old.dispose();
        }
    }

    pub fn get(&self) -> Option<&H> {
        self.current.as_ref()
    }

    pub fn is_live(&self) -> bool {
        self.current.is_some()
    }
}

impl<H: ChartHandle> Drop for ChartSlot<H> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counted(Rc<Cell<usize>>);

    impl ChartHandle for Counted {
        fn dispose(self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_replace_disposes_previous() {
        let disposed = Rc::new(Cell::new(0));
        let mut slot = ChartSlot::default();

        slot.replace_with(|| Ok(Counted(disposed.clone()))).unwrap();
        assert_eq!(disposed.get(), 0);
        slot.replace_with(|| Ok(Counted(disposed.clone()))).unwrap();
        assert_eq!(disposed.get(), 1);
        assert!(slot.is_live());

        drop(slot);
        assert_eq!(disposed.get(), 2);
    }

    #[test]
    fn test_failed_build_leaves_slot_empty() {
        let disposed = Rc::new(Cell::new(0));
        let mut slot = ChartSlot::default();
        slot.replace_with(|| Ok(Counted(disposed.clone()))).unwrap();

        let result = slot.replace_with(|| Err(anyhow::anyhow!("no surface")));
        assert!(result.is_err());
        assert!(!slot.is_live());
        assert_eq!(disposed.get(), 1);
    }
}
