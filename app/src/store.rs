//! Store runtime: runs a view reducer and its effects.

use eventos_core::effect::Effect;
use eventos_core::reducer::Reducer;
use std::collections::VecDeque;
use tokio::sync::RwLock;

/// The Store - runtime coordinator for a view reducer
///
/// The Store manages:
/// 1. State (behind `RwLock` so readers can look while effects run)
/// 2. Reducer (view logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with feedback loop)
///
/// Effects run one at a time, in the order the reducer returned them. An
/// action produced by an effect is reduced immediately and its own effects
/// run before the remaining ones.
///
/// # Example
///
/// ```ignore
/// let store = Store::new(CatalogState::new(viewer), CatalogReducer::default(), env);
///
/// store.send(CatalogAction::Load).await;
/// let cards = store.state(|s| s.cards().len()).await;
/// ```
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: RwLock<S>,
    reducer: R,
    environment: E,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
    A: std::fmt::Debug,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self {
            state: RwLock::new(initial_state),
            reducer,
            environment,
        }
    }

    async fn reduce(&self, action: A) -> Vec<Effect<A>> {
        tracing::debug!(?action, "Reducing action");
        let mut state = self.state.write().await;
        self.reducer
            .reduce(&mut state, action, &self.environment)
            .into_vec()
    }

    /// Send an action and run every effect it leads to.
    ///
    /// Returns once the reducer has settled: no effect is left pending.
    pub async fn send(&self, action: A) {
        let mut queue: VecDeque<Effect<A>> = self.reduce(action).await.into();

        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::None => {},
                Effect::Sequential(effects) => {
                    for effect in effects.into_iter().rev() {
                        queue.push_front(effect);
                    }
                },
                Effect::Future(future) => {
                    if let Some(next) = future.await {
                        for effect in self.reduce(next).await.into_iter().rev() {
                            queue.push_front(effect);
                        }
                    }
                },
            }
        }
    }

    /// Read state through a closure
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Injected environment
    pub const fn environment(&self) -> &E {
        &self.environment
    }
}
