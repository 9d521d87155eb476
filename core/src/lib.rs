//! # Eventos Core
//!
//! Domain model and client-side rules for the Eventos event management client.
//!
//! The backend owns every business rule. This crate holds the pieces the client
//! needs to pre-validate requests and render consistent state after a refresh:
//!
//! - **Types**: users, events, enrollments and the backend's page envelope
//! - **Lifecycle**: the enrollment state machine and who may drive it
//! - **Capacity**: `is_full` and the gating of new enrollments
//! - **Offers**: which actions a view shows for a role and an entity
//! - **Validation**: form checks that run before any request is sent
//!
//! It also defines the reducer vocabulary used by the application views:
//!
//! - **Reducer**: `(State, Action, Environment) → Effects`
//! - **Effect**: a description of async work whose result is fed back as an action
//! - **Environment**: injected dependencies such as the clock
//!
//! ## Example
//!
//! ```
//! use eventos_core::lifecycle::Transition;
//! use eventos_core::types::EnrollmentStatus;
//!
//! let next = EnrollmentStatus::Pending.apply(Transition::Confirm);
//! assert_eq!(next, Ok(EnrollmentStatus::Confirmed));
//!
//! // Nothing leaves Canceled
//! assert!(EnrollmentStatus::Canceled.apply(Transition::Cancel).is_err());
//! ```

pub mod capacity;
pub mod error;
pub mod lifecycle;
pub mod offers;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use chrono::{DateTime, NaiveDateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

pub use error::{LifecycleError, ValidationError};
pub use types::{Enrollment, EnrollmentStatus, Event, Page, Role, User};

/// Reducer module - the trait every view implements
///
/// Reducers validate an action, update state in place and describe the async
/// work that should follow. They never perform I/O themselves.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl Reducer for CatalogReducer {
    ///     type State = CatalogState;
    ///     type Action = CatalogAction;
    ///     type Environment = AppEnvironment<B>;
    ///
    ///     fn reduce(
    ///         &self,
    ///         state: &mut CatalogState,
    ///         action: CatalogAction,
    ///         env: &AppEnvironment<B>,
    ///     ) -> SmallVec<[Effect<CatalogAction>; 4]> {
    ///         match action {
    ///             CatalogAction::Load => smallvec![load_catalog(env)],
    ///             _ => smallvec![Effect::None],
    ///         }
    ///     }
    /// }
    /// ```
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// # Arguments
        ///
        /// - `state`: Mutable reference to current view state
        /// - `action`: The action to process
        /// - `env`: Reference to injected dependencies
        ///
        /// # Returns
        ///
        /// Effects to be executed by the store, in order
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// The client is single-threaded from the user's point of view, so there is
/// no parallel variant: effects run one after another and every action they
/// produce is reduced before the next effect starts.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Boxed future produced by an effect
    pub type EffectFuture<Action> = Pin<Box<dyn Future<Output = Option<Action>> + Send>>;

    /// Effect type - describes a side effect to be executed by the store
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(EffectFuture<Action>),

        /// Run effects in order, each one fully settled before the next
        Sequential(Vec<Effect<Action>>),
    }

    impl<Action> Effect<Action> {
        /// Wrap a future into an effect
        pub fn future<F>(future: F) -> Self
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(future))
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Whether this effect does nothing at all
        #[must_use]
        pub fn is_none(&self) -> bool {
            match self {
                Effect::None => true,
                Effect::Future(_) => false,
                Effect::Sequential(effects) => effects.iter().all(Effect::is_none),
            }
        }
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
            }
        }
    }
}

/// Environment module - dependency injection traits
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock used outside of tests
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
