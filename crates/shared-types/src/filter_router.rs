use crate::search_params::{ParamKey, SearchParams, Sort};

/// A single filter mutation requested by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Add(ParamKey, String),
    Delete(ParamKey, Option<String>),
    SetPage(u32),
    SetSort(Sort),
}

/// Parameter groups that snap back to their default whenever an unrelated
/// mutation lands. Changing a filter returns you to page 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetKey {
    Page,
}

impl Mutation {
    fn touches(&self, reset_key: ResetKey) -> bool {
        match reset_key {
            ResetKey::Page => matches!(self, Mutation::SetPage(_)),
        }
    }

    fn apply_to(&self, params: &mut SearchParams) {
        match self {
            Mutation::Add(key, value) => params.add_value(*key, value),
            Mutation::Delete(key, value) => params.delete_value(*key, value.as_deref()),
            Mutation::SetPage(page) => params.page = (*page).max(1),
            Mutation::SetSort(sort) => params.sort = *sort,
        }
    }
}

/// Optimistic view of URL search-parameter state.
///
/// Per pending navigation the router moves `idle -> pending -> idle`. A
/// mutation immediately produces a predicted parameter bag (so dependent UI
/// reflects the selection before the round trip completes) and hands back an
/// epoch; when the navigation completes, `confirm` reconciles the predicted
/// state with the server-confirmed URL. Mutations issued faster than
/// round-trip time are last-writer-wins on the predicted bag: a completion
/// carrying a stale epoch updates the confirmed state but leaves the newer
/// prediction pending.
#[derive(Debug, Clone)]
pub struct FilterRouter {
    confirmed: SearchParams,
    predicted: Option<SearchParams>,
    epoch: u64,
    reset_keys: Vec<ResetKey>,
}

impl FilterRouter {
    pub fn new(confirmed: SearchParams) -> Self {
        Self::with_reset_keys(confirmed, vec![ResetKey::Page])
    }

    pub fn with_reset_keys(confirmed: SearchParams, reset_keys: Vec<ResetKey>) -> Self {
        FilterRouter {
            confirmed,
            predicted: None,
            epoch: 0,
            reset_keys,
        }
    }

    /// The parameter bag the UI should render right now: the prediction while
    /// a navigation is in flight, the confirmed state otherwise.
    pub fn current(&self) -> &SearchParams {
        self.predicted.as_ref().unwrap_or(&self.confirmed)
    }

    pub fn is_pending(&self) -> bool {
        self.predicted.is_some()
    }

    /// Apply a mutation optimistically. Returns the epoch identifying this
    /// navigation and the parameter bag to navigate to.
    pub fn mutate(&mut self, mutation: Mutation) -> (u64, SearchParams) {
        let mut next = self.current().clone();
        for reset_key in &self.reset_keys {
            if !mutation.touches(*reset_key) {
                match reset_key {
                    ResetKey::Page => next.page = 1,
                }
            }
        }
        mutation.apply_to(&mut next);

        self.epoch += 1;
        self.predicted = Some(next.clone());
        (self.epoch, next)
    }

    /// Reconcile a completed navigation. `confirmed` is the parameter bag
    /// decoded from the server-confirmed URL. If a newer mutation is already
    /// pending the prediction is kept and only the confirmed baseline moves.
    pub fn confirm(&mut self, epoch: u64, confirmed: SearchParams) {
        self.confirmed = confirmed;
        if epoch >= self.epoch {
            self.predicted = None;
        }
    }
}
