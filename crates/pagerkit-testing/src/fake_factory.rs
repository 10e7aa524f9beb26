//! In-memory [`PageFactory`] backed by a list of item titles.
//!
//! Content for position `p` shows the title of item `p - 1`. The registry is
//! shared through an `Rc`, so tests can mutate the item list, inject
//! failures, and keep content alive across a save/restore cycle the way a
//! host's content manager would.

use std::cell::RefCell;
use std::rc::Rc;

use pagerkit_core::{ContentError, PageFactory};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(pub u64);

/// State captured when content is destroyed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeState {
    pub title: String,
    pub saves: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivePage {
    pub title: String,
    pub visible: bool,
    pub saves: u32,
    pub restored: bool,
}

#[derive(Debug, Default)]
pub struct ContentRegistry {
    items: Vec<String>,
    next_id: u64,
    live: FxHashMap<ContentId, LivePage>,
    failing: FxHashSet<usize>,
    created_positions: Vec<usize>,
    destroyed: Vec<ContentId>,
}

impl ContentRegistry {
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn live_page(&self, id: ContentId) -> Option<&LivePage> {
        self.live.get(&id)
    }

    pub fn title_of(&self, id: ContentId) -> Option<&str> {
        self.live.get(&id).map(|page| page.title.as_str())
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Every position passed to `create_content`, in call order.
    pub fn created_positions(&self) -> &[usize] {
        &self.created_positions
    }

    pub fn destroyed(&self) -> &[ContentId] {
        &self.destroyed
    }

    pub fn visible_titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = self
            .live
            .values()
            .filter(|page| page.visible)
            .map(|page| page.title.clone())
            .collect();
        titles.sort();
        titles
    }
}

pub type SharedRegistry = Rc<RefCell<ContentRegistry>>;

#[derive(Debug, Clone)]
pub struct FakePageFactory {
    registry: SharedRegistry,
}

impl FakePageFactory {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let registry = ContentRegistry {
            items: items.into_iter().map(Into::into).collect(),
            ..ContentRegistry::default()
        };
        Self::with_registry(Rc::new(RefCell::new(registry)))
    }

    /// Creates a factory over an existing registry, e.g. to restore a pager
    /// whose content is still alive.
    pub fn with_registry(registry: SharedRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> SharedRegistry {
        Rc::clone(&self.registry)
    }

    pub fn set_items<I, S>(&self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.borrow_mut().items = items.into_iter().map(Into::into).collect();
    }

    /// Removes item `index` (zero-based) and returns its title.
    pub fn remove_item(&self, index: usize) -> String {
        self.registry.borrow_mut().items.remove(index)
    }

    pub fn fail_position(&self, position: usize) {
        self.registry.borrow_mut().failing.insert(position);
    }

    pub fn clear_failures(&self) {
        self.registry.borrow_mut().failing.clear();
    }
}

impl PageFactory for FakePageFactory {
    type Handle = ContentId;
    type State = FakeState;
    type Reference = String;

    fn create_content(&mut self, position: usize) -> Result<ContentId, ContentError> {
        let mut registry = self.registry.borrow_mut();
        registry.created_positions.push(position);
        if registry.failing.contains(&position) {
            return Err(ContentError::new(format!("injected failure at {position}")));
        }
        let Some(title) = position
            .checked_sub(1)
            .and_then(|index| registry.items.get(index))
            .cloned()
        else {
            return Err(ContentError::new(format!("no item backs position {position}")));
        };
        registry.next_id += 1;
        let id = ContentId(registry.next_id);
        registry.live.insert(
            id,
            LivePage {
                title,
                visible: false,
                saves: 0,
                restored: false,
            },
        );
        Ok(id)
    }

    fn destroy_content(&mut self, handle: &ContentId) {
        let mut registry = self.registry.borrow_mut();
        if registry.live.remove(handle).is_some() {
            registry.destroyed.push(*handle);
        }
    }

    fn save_state(&mut self, handle: &ContentId) -> Option<FakeState> {
        let registry = self.registry.borrow();
        let page = registry.live.get(handle)?;
        Some(FakeState {
            title: page.title.clone(),
            saves: page.saves + 1,
        })
    }

    fn attach_saved_state(&mut self, handle: &ContentId, state: &FakeState) {
        if let Some(page) = self.registry.borrow_mut().live.get_mut(handle) {
            page.saves = state.saves;
            page.restored = true;
        }
    }

    fn set_user_visible(&mut self, handle: &ContentId, visible: bool) {
        if let Some(page) = self.registry.borrow_mut().live.get_mut(handle) {
            page.visible = visible;
        }
    }

    fn reference_for(&self, handle: &ContentId) -> Option<String> {
        Some(format!("content-{}", handle.0))
    }

    fn resolve_reference(&mut self, reference: &String) -> Option<ContentId> {
        let id = reference.strip_prefix("content-")?.parse().ok().map(ContentId)?;
        self.registry.borrow().live.contains_key(&id).then_some(id)
    }
}
